//! Error types for rule derivation.

use thiserror::Error;

/// Malformed validation directives.
///
/// Every variant names the offending field by its fully-qualified path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// A `min` or `max` bound is not a number.
    #[error("invalid {key} value '{value}' for field {field}")]
    InvalidBound {
        /// Field path.
        field: String,
        /// `min` or `max`.
        key: &'static str,
        /// Raw value.
        value: String,
    },

    /// A fractional bound on an integer field, or a negative length.
    #[error("{key} value '{value}' does not fit {kind} field {field}")]
    BoundKindMismatch {
        /// Field path.
        field: String,
        /// `min` or `max`.
        key: &'static str,
        /// Raw value.
        value: String,
        /// Field kind.
        kind: String,
    },

    /// `min`/`max` declared on a kind that has no ordering.
    #[error("min/max not supported on {kind} field {field}")]
    RangeOnUnsupportedKind {
        /// Field path.
        field: String,
        /// Field kind.
        kind: String,
    },

    /// The `is` keyword is not a known format class.
    #[error("invalid validate \"is\" value '{value}' on field {field}")]
    UnknownFormat {
        /// Field path.
        field: String,
        /// Raw keyword.
        value: String,
    },

    /// A format class on a field that is not a string.
    #[error("format '{format}' requires a string field, {field} is {kind}")]
    FormatOnNonString {
        /// Field path.
        field: String,
        /// Format keyword.
        format: String,
        /// Field kind.
        kind: String,
    },

    /// The `in` members mix types.
    #[error("mixed-type \"in\" members on field {field}: {members}")]
    MixedMembers {
        /// Field path.
        field: String,
        /// Members as written.
        members: String,
    },

    /// The `in` members do not match the field's kind.
    #[error("\"in\" members {members} do not fit {kind} field {field}")]
    MembersKindMismatch {
        /// Field path.
        field: String,
        /// Members as written.
        members: String,
        /// Field kind.
        kind: String,
    },

    /// An `in` member names no value of the field's enum.
    #[error("invalid value {member} for enum {enumeration} on field {field}")]
    UnknownEnumMember {
        /// Field path.
        field: String,
        /// Offending member.
        member: String,
        /// Enum name.
        enumeration: String,
    },
}

/// Result type for rule derivation.
pub type RuleResult<T> = Result<T, RuleError>;
