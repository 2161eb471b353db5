//! Converter, method and mutator specifications.
//!
//! Down converters carry a public value to the next or private version;
//! Up converters rebuild a public value from the next version's output
//! and the private record. Enum Up conversion folds source values through
//! receive tables. Methods route their requests through these converters
//! and forward deprecated request fields with side mutators.
//!
//! - Spec types in [`domain`]
//! - Closure walk, receive tables and method routing in [`services`]

pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;

pub use domain::{
    Action, Assignment, CheckTarget, Claim, ConverterKind, ConverterRef, ConverterSpec,
    DeprecatedInput, EnumCase, EnumConverter, MessageConverter, MethodSpec, MutatorSpec,
    OneofMapping, Receive, ReceiveTable, RequiredCheck, Route, Setter, Shape, Side, VariantArm,
};
pub use error::{ConversionError, ConversionResult};
pub use services::{ConverterPlanner, VersionConversions, resolve_receivers, specify_version};
