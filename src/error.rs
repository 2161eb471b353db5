//! Crate-level error type.

use thiserror::Error;

use crate::chain::ChainError;
use crate::conversion::ConversionError;
use crate::descriptor::DescriptorError;
use crate::emit::EmitError;
use crate::plan::ConfigError;
use crate::validation::RuleError;

/// Any failure of a generation run.
///
/// Every stage error already names the offending entity, so variants are
/// transparent.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Invalid generator parameters.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Unreadable descriptors.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// Chain configuration or resolution failure.
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// Malformed validation directive.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Converter specification failure.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Rendering or writing failure.
    #[error(transparent)]
    Emit(#[from] EmitError),
}
