//! Domain types for compiled schema descriptors.

pub mod kind;
pub mod schema;
pub mod set;

pub use kind::{FieldKind, ScalarKind};
pub use schema::{
    Carrier, Comments, EnumSchema, EnumValueSchema, FieldSchema, MessageSchema, MethodSchema,
    OneofSchema, PackageSchema, ServiceSchema,
};
pub use set::{
    DescriptorSet, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, Location,
    MessageDescriptor, MethodDescriptor, OneofDescriptor, OptionMap, ServiceDescriptor,
    SourceCodeInfo,
};
