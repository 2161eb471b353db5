//! Conversion domain types.

pub mod receive;
pub mod spec;

pub use receive::{Claim, Receive, ReceiveTable};
pub use spec::{
    Action, Assignment, CheckTarget, ConverterKind, ConverterRef, ConverterSpec, DeprecatedInput,
    EnumCase, EnumConverter, MessageConverter, MethodSpec, MutatorSpec, OneofMapping,
    RequiredCheck, Route, Setter, Shape, Side, VariantArm, setter_name,
};
