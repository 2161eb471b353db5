//! Error types for the plugin protocol.

use thiserror::Error;

/// Failures of the protoc plugin exchange itself.
///
/// Generation failures are not among them; those travel back to protoc in
/// `CodeGeneratorResponse.error`.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The request bytes are not a `CodeGeneratorRequest`.
    #[error("failed to decode code generator request: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Reading the request or writing the response failed.
    #[error("plugin i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the plugin exchange.
pub type PluginResult<T> = Result<T, PluginError>;
