//! Up-conversion tables for enum values.

use serde::Serialize;

use crate::chain::{EnumId, EnumValueId};

/// How a source value came to fold into a public value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Claim {
    /// The public value's own canonical delegate.
    Canonical,
    /// Declared with a receive directive.
    Explicit,
}

/// One source value folding into a public value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receive {
    /// Value read on Up conversion.
    pub source: EnumValueId,
    /// Source value name.
    pub source_name: String,
    /// Public value written.
    pub public: EnumValueId,
    /// Public value name.
    pub public_name: String,
    /// How the claim was made.
    pub claim: Claim,
}

/// Union of canonical delegates and receive claims for one enum pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReceiveTable {
    /// Public enum written.
    pub public: EnumId,
    /// Next or private enum read.
    pub source: EnumId,
    /// Entries grouped by public value in declaration order; each group
    /// lists the canonical delegate first, then receive claims as
    /// declared.
    pub entries: Vec<Receive>,
}

impl ReceiveTable {
    /// Public value a source value folds into.
    #[must_use]
    pub fn lookup(&self, source: EnumValueId) -> Option<EnumValueId> {
        self.entries
            .iter()
            .find(|entry| entry.source == source)
            .map(|entry| entry.public)
    }

    /// Source values folding into one public value.
    pub fn received_by(&self, public: EnumValueId) -> impl Iterator<Item = &Receive> {
        self.entries
            .iter()
            .filter(move |entry| entry.public == public)
    }
}
