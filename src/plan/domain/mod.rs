//! Plan and configuration types.

pub mod config;
pub mod plan;

pub use config::{AnnotationCarrier, DEFAULT_OUT_PREFIX, DEFAULT_PRIVATE_PACKAGE, GeneratorConfig};
pub use plan::{GenerationPlan, VersionPlan};
