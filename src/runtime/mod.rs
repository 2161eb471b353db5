//! In-process execution of a generation plan.
//!
//! The runtime runs the same validator, converter and method specs the
//! emitter renders, over dynamic [`Record`]s instead of generated message
//! types. A [`Registry`] takes per-version overrides keyed by
//! `<package>.Validator` and `<package>.Converter`, then builds a
//! [`ServiceChain`] whose private version delegates to a [`Backend`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

pub use domain::{Code, INCOMPATIBLE_RESOURCE, Record, Status, Value};
pub use error::{RegistryError, RegistryResult};
pub use ports::{Backend, ConverterStrategy, DefaultStrategy, ValidatorStrategy};
pub use services::{Converter, EMAIL_PATTERN, Registry, ServiceChain, Validator};
