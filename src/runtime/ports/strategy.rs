//! Swappable validator and converter strategies.
//!
//! Every method has a default that runs the generated behaviour, so an
//! override only implements what it changes and reaches the generated
//! behaviour through `base`.

use crate::runtime::{
    domain::{Record, Status},
    services::{Converter, Validator},
};

/// Strategy for a version's validator.
pub trait ValidatorStrategy {
    /// Validates `input` with validator function `function`.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidArgument` status naming the failing field.
    fn validate(&self, base: &Validator<'_>, function: &str, input: &Record) -> Result<(), Status> {
        base.validate(function, input)
    }
}

/// Strategy for a version's converter.
pub trait ConverterStrategy {
    /// Converts a request with Down converter `function`.
    ///
    /// # Errors
    ///
    /// Returns the status of the failing conversion.
    fn down(&self, base: &Converter<'_>, function: &str, input: &Record) -> Result<Record, Status> {
        base.down(function, input)
    }

    /// Converts a response with Up converter `function`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when a receive-required field is empty and
    /// `FailedPrecondition` for enum values with no public counterpart.
    fn up(
        &self,
        base: &Converter<'_>,
        function: &str,
        next: Option<&Record>,
        private: &Record,
    ) -> Result<Record, Status> {
        base.up(function, next, private)
    }
}

/// The generated behaviour, unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStrategy;

impl ValidatorStrategy for DefaultStrategy {}

impl ConverterStrategy for DefaultStrategy {}
