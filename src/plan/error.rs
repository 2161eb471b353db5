//! Error types for generator configuration.

use thiserror::Error;

/// Invalid generator parameters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The parameter key is not recognised.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// The parameter value is not accepted.
    #[error("invalid value '{value}' for parameter '{key}'")]
    InvalidValue {
        /// Parameter key.
        key: String,
        /// Rejected value.
        value: String,
    },
}

impl ConfigError {
    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
        }
    }
}
