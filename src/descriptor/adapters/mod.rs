//! Annotation carrier implementations.

pub mod comments;
pub mod options;

pub use comments::CommentAnnotations;
pub use options::OptionAnnotations;
