//! Runtime value and status types.

pub mod record;
pub mod status;

pub use record::{Record, Value};
pub use status::{Code, INCOMPATIBLE_RESOURCE, Status};
