//! Generated unit emission.
//!
//! A [`crate::plan::GenerationPlan`] is rendered through embedded
//! `minijinja` templates into one service unit per chain version and a
//! root register unit, then written through a `cap-std` directory handle.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
mod tests;

pub use adapters::{open_output_dir, write_artifacts};
pub use domain::{Artifact, EmitConfig, REGISTER_FILE, SERVICE_FILE};
pub use error::{EmitError, EmitResult};
pub use services::render;
