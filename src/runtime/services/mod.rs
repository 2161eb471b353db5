//! Runtime services: converter and validator interpreters, the override
//! registry and the service chain.

pub mod chain;
pub mod converter;
pub mod validator;

pub use chain::{Registry, ServiceChain};
pub use converter::Converter;
pub use validator::{EMAIL_PATTERN, Validator};
