//! Descriptor ingestion for the generator.
//!
//! Compiled schemas arrive either as a JSON `FileDescriptorSet` (the shape
//! `buf build -o -#format=json` writes) or through the protoc plugin
//! protocol, which [`crate::plugin`] lowers into the same model. This module
//! groups the raw entities by package, attaches their comments and options
//! as annotation [`domain::Carrier`]s, and exposes the annotation facts
//! through one capability trait. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - The annotation capability in [`ports`]
//! - Comment and option carriers in [`adapters`]
//! - Package grouping in [`services`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

pub use adapters::{CommentAnnotations, OptionAnnotations};
pub use domain::{
    Carrier, Comments, DescriptorSet, EnumSchema, EnumValueSchema, FieldKind, FieldSchema,
    MessageSchema, MethodSchema, OneofSchema, PackageSchema, ScalarKind, ServiceSchema,
};
pub use error::{AnnotationError, DescriptorError};
#[cfg(test)]
pub use ports::MockAnnotationSource;
pub use ports::{AnnotationSource, EntityKind, ReceiveDirectives, ValidateDirectives};
pub use services::ingest;
