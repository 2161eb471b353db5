//! Emitter domain types.

pub mod artifact;
pub mod templates;
pub mod view;

pub use artifact::{Artifact, EmitConfig, REGISTER_FILE, SERVICE_FILE};
pub use view::{RegisterView, VersionView};
