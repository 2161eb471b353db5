//! The private service implementation.

use crate::runtime::domain::{Record, Status};

/// Implementation behind the private service version.
///
/// Requests arrive fully converted to private shapes, with every side
/// mutation applied.
#[cfg_attr(test, mockall::automock)]
pub trait Backend {
    /// Handles one private method call.
    ///
    /// # Errors
    ///
    /// Returns a [`Status`] for business failures such as unknown
    /// resources.
    fn call(&mut self, method: &str, request: &Record) -> Result<Record, Status>;
}
