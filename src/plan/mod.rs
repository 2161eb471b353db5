//! Generation planning: configuration and the end-to-end pipeline.
//!
//! [`generate`] turns a descriptor set into a [`GenerationPlan`]: the
//! resolved chain plus, per version, its validators, converters, methods,
//! mutators and enum receive tables. The plan is what both the emitter
//! and the runtime interpreter consume.

pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;

pub use domain::{
    AnnotationCarrier, DEFAULT_OUT_PREFIX, DEFAULT_PRIVATE_PACKAGE, GenerationPlan,
    GeneratorConfig, VersionPlan,
};
pub use error::ConfigError;
pub use services::{build_chain, generate, plan_chain};
