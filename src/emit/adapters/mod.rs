//! Filesystem adapter for generated units.

pub mod fs;

pub use fs::{open_output_dir, write_artifacts};
