//! Error types for assembling a runtime service chain.

use thiserror::Error;

/// Errors raised while registering overrides or building a service chain.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// An override was registered under a key no version owns.
    #[error("no generated validator or converter is registered as '{0}'")]
    UnknownOverride(String),

    /// The plan carries no private version.
    #[error("the service chain has no private version")]
    MissingPrivate,

    /// The e-mail pattern failed to compile.
    #[error("invalid e-mail pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
