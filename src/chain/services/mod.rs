//! Chain construction services.

pub mod builder;
pub mod classifier;
pub mod resolver;

pub use builder::{ChainBuilder, version_order};
pub use classifier::{classify, classify_pair};
pub use resolver::resolve;
