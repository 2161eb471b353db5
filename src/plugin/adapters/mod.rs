//! Descriptor proto lowering.

pub mod lower;

pub use lower::{lower_file, lower_request};
