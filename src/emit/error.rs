//! Error types for unit rendering and writing.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while rendering or writing generated units.
#[derive(Debug, Error)]
pub enum EmitError {
    /// A template failed to render.
    #[error("failed to render {unit}: {reason}")]
    Template {
        /// Unit being rendered.
        unit: String,
        /// Renderer message.
        reason: String,
    },

    /// An artifact could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Artifact path.
        path: Utf8PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl EmitError {
    /// Creates a template error for `unit`.
    #[must_use]
    pub fn template(unit: impl Into<String>, error: &minijinja::Error) -> Self {
        Self::Template {
            unit: unit.into(),
            reason: error.to_string(),
        }
    }
}

/// Result type for emission.
pub type EmitResult<T> = Result<T, EmitError>;
