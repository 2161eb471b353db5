//! Rendering services.

pub mod render;

pub use render::render;
