//! How a field value crosses one hop of the chain.

use serde::Serialize;

/// What a nested converter call converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvertKind {
    /// A message-typed field.
    Message,
    /// An enum-typed field.
    Enum,
}

/// Classification of a field pair across one hop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "propagation", content = "kind")]
pub enum Propagation {
    /// Identical scalar kinds; the value is copied.
    Copy,
    /// A nested converter is invoked.
    Convert(ConvertKind),
    /// Both sides reference the same message type outside the chain, such
    /// as a well-known type, so the value is copied as-is.
    Shared,
    /// No automatic propagation exists; the field is left to an override.
    #[default]
    Unconvertible,
}

impl Propagation {
    /// True when the pair is a trivial scalar copy.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Copy)
    }

    /// True when the generated converter moves the value at all.
    #[must_use]
    pub const fn is_propagated(self) -> bool {
        !matches!(self, Self::Unconvertible)
    }
}
