//! Annotation capability port.
//!
//! Schemas declare delegate overrides, deprecation, validation and receive
//! facts either as tagged comments or as typed option extensions. Chain
//! building is written once against [`AnnotationSource`]; the carriers live
//! in [`crate::descriptor::adapters`].

use std::fmt;

use serde::Serialize;

use crate::descriptor::{domain::Carrier, error::AnnotationError};

/// Result type for annotation lookups.
pub type AnnotationResult<T> = Result<T, AnnotationError>;

/// Kind of entity an annotation is read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A message.
    Message,
    /// A field.
    Field,
    /// A oneof.
    Oneof,
    /// An enum.
    Enum,
    /// An enum value.
    EnumValue,
    /// An RPC method.
    Method,
}

impl EntityKind {
    /// Lower-case label for diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Field => "field",
            Self::Oneof => "oneof",
            Self::Enum => "enum",
            Self::EnumValue => "enum value",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation directives declared on a field or oneof.
///
/// Bounds, members and the format keyword are kept as written; the rule
/// deriver parses and type-checks them against the field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidateDirectives {
    /// `required=true`.
    pub required: bool,
    /// Raw `min` bound.
    pub min: Option<String>,
    /// Raw `max` bound.
    pub max: Option<String>,
    /// Raw `in` members.
    pub members: Option<Vec<String>>,
    /// Raw `is` format keyword.
    pub format: Option<String>,
}

impl ValidateDirectives {
    /// Returns true when any directive was declared.
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.required
            || self.min.is_some()
            || self.max.is_some()
            || self.members.is_some()
            || self.format.is_some()
    }
}

/// Receive directives declared on a field, oneof or enum value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReceiveDirectives {
    /// The field must be set on the record being received.
    pub required: bool,
    /// Additional source enum values folded into this value.
    pub names: Vec<String>,
}

/// Capability exposing the annotation facts of one entity.
#[cfg_attr(test, mockall::automock)]
pub trait AnnotationSource {
    /// Returns the explicit delegate name, if declared.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` when the directive is malformed.
    fn delegate_name(&self, kind: EntityKind, carrier: &Carrier)
    -> AnnotationResult<Option<String>>;

    /// Returns whether the entity is marked deprecated.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` when the carrier cannot be decoded.
    fn deprecated(&self, kind: EntityKind, carrier: &Carrier) -> AnnotationResult<bool>;

    /// Returns the validation directives.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` when a directive is malformed.
    fn validate_directives(
        &self,
        kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<ValidateDirectives>;

    /// Returns the receive directives.
    ///
    /// # Errors
    ///
    /// Returns `AnnotationError` when a directive is malformed.
    fn receive_directives(
        &self,
        kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<ReceiveDirectives>;
}
