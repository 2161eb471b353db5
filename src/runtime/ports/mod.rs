//! Runtime ports: the private implementation and override strategies.

pub mod backend;
pub mod strategy;

#[cfg(test)]
pub use backend::MockBackend;
pub use backend::Backend;
pub use strategy::{ConverterStrategy, DefaultStrategy, ValidatorStrategy};
