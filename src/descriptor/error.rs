//! Error types for descriptor loading and annotation parsing.

use thiserror::Error;

/// Errors raised while reading an annotation carrier.
///
/// Annotation errors do not know which entity they belong to; callers wrap
/// them with the entity name before surfacing them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AnnotationError {
    /// A `delegate` directive used a key other than `name`.
    #[error("invalid key for delegate annotation: {0}")]
    InvalidDelegateKey(String),

    /// A directive token was not a recognised `key=value` pair.
    #[error("malformed {directive} directive token '{token}'")]
    MalformedToken {
        /// Directive verb the token belonged to.
        directive: String,
        /// Offending token.
        token: String,
    },

    /// A typed option extension could not be decoded.
    #[error("invalid {extension} option: {message}")]
    InvalidOption {
        /// Extension key, for example `[gen.svc.field]`.
        extension: String,
        /// Decoder message.
        message: String,
    },
}

impl AnnotationError {
    /// Creates a malformed-token error.
    #[must_use]
    pub fn malformed(directive: impl Into<String>, token: impl Into<String>) -> Self {
        Self::MalformedToken {
            directive: directive.into(),
            token: token.into(),
        }
    }
}

/// Errors raised while loading and ingesting descriptor sets.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor set JSON could not be parsed.
    #[error("failed to parse descriptor set: {0}")]
    Json(#[from] serde_json::Error),

    /// A descriptor entity had no name.
    #[error("{kind} in file '{file}' has no name")]
    MissingName {
        /// Entity kind label.
        kind: &'static str,
        /// File the entity was declared in.
        file: String,
    },

    /// A field used a wire type the generator does not model.
    #[error("field {field} has unsupported type '{field_type}'")]
    UnknownFieldType {
        /// Fully-qualified field name.
        field: String,
        /// Raw descriptor type label.
        field_type: String,
    },
}

impl DescriptorError {
    /// Creates a missing-name error.
    #[must_use]
    pub fn missing_name(kind: &'static str, file: impl Into<String>) -> Self {
        Self::MissingName {
            kind,
            file: file.into(),
        }
    }
}

/// Result type for descriptor operations.
pub type DescriptorResult<T> = Result<T, DescriptorError>;
