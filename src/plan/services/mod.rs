//! Pipeline services.

pub mod pipeline;

pub use pipeline::{build_chain, generate, plan_chain};
