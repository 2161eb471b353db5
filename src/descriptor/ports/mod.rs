//! Port definitions for annotation access.

pub mod annotations;

pub use annotations::{
    AnnotationResult, AnnotationSource, EntityKind, ReceiveDirectives, ValidateDirectives,
};

#[cfg(test)]
pub use annotations::MockAnnotationSource;
