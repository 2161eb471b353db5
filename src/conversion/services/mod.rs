//! Converter specification services.

pub mod converters;
pub mod methods;
pub mod receivers;

pub use converters::ConverterPlanner;
pub use methods::{VersionConversions, specify_version};
pub use receivers::resolve_receivers;
