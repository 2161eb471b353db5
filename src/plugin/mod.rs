//! The protoc plugin protocol.
//!
//! protoc writes a serialized `CodeGeneratorRequest` to the plugin's stdin
//! and reads a `CodeGeneratorResponse` from its stdout. Requests are
//! lowered into the descriptor set model and run through
//! [`crate::plan::generate`]; rendered units become response files.

pub mod adapters;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;

pub use adapters::lower_request;
pub use error::{PluginError, PluginResult};
pub use services::{FEATURE_PROTO3_OPTIONAL, decode_request, handle, request_config, run};
