//! Domain types for the version chain.

pub mod ids;
pub mod model;
pub mod propagation;

pub use ids::{EnumId, EnumValueId, FieldId, MessageId, MethodId, OneofId, VersionId};
pub use model::{Chain, Enum, EnumValue, Field, Message, Method, Oneof, TypeRef, Version};
pub use propagation::{ConvertKind, Propagation};
