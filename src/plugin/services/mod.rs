//! Plugin exchange services.

pub mod exchange;

pub use exchange::{FEATURE_PROTO3_OPTIONAL, decode_request, handle, request_config, run};
