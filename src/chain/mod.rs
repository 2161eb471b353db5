//! The version chain: ordering, correspondence and match classification.
//!
//! Public versions delegate to the next version and the chain terminates
//! at the private service. Every public message, field, oneof, enum, enum
//! value and method is linked to its counterpart in the next and private
//! versions, and every field pair is classified as a trivial copy or a
//! nested conversion.
//!
//! - Arena types in [`domain`]
//! - Building, resolution and classification in [`services`]

pub mod domain;
pub mod error;
pub mod services;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{
    Chain, ConvertKind, EnumId, EnumValueId, Field, FieldId, MessageId, Method, MethodId, OneofId,
    Propagation, TypeRef, VersionId,
};
pub use error::{ChainError, ChainResult};
pub use services::ChainBuilder;
