//! Converter, method and mutator specifications.
//!
//! Specs name record fields rather than arena ids so they can be rendered
//! or interpreted without the chain at hand.

use std::fmt;

use serde::Serialize;

use crate::chain::{Chain, EnumId, FieldId, MessageId, MethodId, OneofId};

/// Direction and target of a generated converter function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ConverterKind {
    /// Public value down to the next version.
    ToNext,
    /// Public value straight down to the private version.
    ToPrivate,
    /// Up into a current public shape.
    ToPublic,
    /// Up into a deprecated public shape, from private only.
    ToDeprecatedPublic,
}

impl ConverterKind {
    /// Function name prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::ToNext => "ToNext",
            Self::ToPrivate => "ToPrivate",
            Self::ToPublic => "ToPublic",
            Self::ToDeprecatedPublic => "ToDeprecatedPublic",
        }
    }

    /// True for converters that move data towards the private service.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::ToNext | Self::ToPrivate)
    }

    /// Generated function name for a message or enum local name, for
    /// example `ToNextCreateRequest` or `ToPublicPerson_Employment`.
    #[must_use]
    pub fn function_name(self, local_name: &str) -> String {
        format!("{}{}", self.prefix(), Chain::type_ident(local_name))
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Which records a message converter reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Reads the public record and writes its counterpart.
    Down,
    /// Reads only the private record.
    UpFromPrivate,
    /// Reads the next version's record and the private record together.
    UpFromNext,
}

/// Record a value is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The public record handed to a Down converter.
    Public,
    /// The next version's record.
    Next,
    /// The private record.
    Private,
}

/// Reference to another converter of the same version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConverterRef {
    /// Converter kind.
    pub kind: ConverterKind,
    /// Generated function name.
    pub function: String,
}

/// How a value reaches its destination field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "converter")]
pub enum Action {
    /// Direct value copy.
    Copy,
    /// Nested converter call.
    Convert(ConverterRef),
}

/// One field assignment of a message converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    /// Public field the assignment belongs to.
    pub field: FieldId,
    /// Record the value is read from.
    pub read: Side,
    /// Field name on the read side.
    pub from: String,
    /// Field name on the written record.
    pub to: String,
    /// Private field threaded into a nested `UpFromNext` call.
    pub private_from: Option<String>,
    /// Element-wise mapping.
    pub repeated: bool,
    /// Copy or nested call.
    pub action: Action,
}

/// One variant arm of a oneof mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantArm {
    /// Variant name on the read side.
    pub from: String,
    /// Variant name on the written record.
    pub to: String,
    /// Private variant threaded into a nested `UpFromNext` call.
    pub private_from: Option<String>,
    /// Copy or nested call.
    pub action: Action,
}

/// Switch over the set variant of a oneof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneofMapping {
    /// Public oneof.
    pub oneof: OneofId,
    /// Record the oneof is read from.
    pub read: Side,
    /// Oneof name on the read side.
    pub from: String,
    /// Oneof name on the written record.
    pub to: String,
    /// Private oneof threaded into nested `UpFromNext` calls.
    pub private_from: Option<String>,
    /// Arms in variant declaration order.
    pub arms: Vec<VariantArm>,
}

/// What a receive-required check inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckTarget {
    /// A plain field must be non-empty.
    Field,
    /// A oneof must have a variant set.
    Oneof,
}

/// A field that must be present on the record being received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredCheck {
    /// Record that currently owns the value.
    pub read: Side,
    /// Field or oneof name on that record.
    pub name: String,
    /// Field or oneof.
    pub target: CheckTarget,
    /// Public name reported on failure.
    pub public_name: String,
}

/// Converter between one public message and its counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageConverter {
    /// Generated function name.
    pub function: String,
    /// Converter kind.
    pub kind: ConverterKind,
    /// Records read.
    pub shape: Shape,
    /// Public message.
    pub message: MessageId,
    /// Fully-qualified public message name.
    pub public_name: String,
    /// Next or private message on the other side.
    pub counterpart: MessageId,
    /// Fully-qualified counterpart name.
    pub counterpart_name: String,
    /// Private message, for `UpFromNext`.
    pub private: Option<MessageId>,
    /// Receive-required checks, run before any assignment.
    pub required: Vec<RequiredCheck>,
    /// Plain field assignments in declaration order.
    pub assignments: Vec<Assignment>,
    /// Oneof mappings in declaration order.
    pub oneofs: Vec<OneofMapping>,
    /// Public fields with no automatic conversion.
    pub unconverted: Vec<String>,
}

impl MessageConverter {
    /// Fully-qualified name of the record this converter produces.
    #[must_use]
    pub fn output_name(&self) -> &str {
        if self.kind.is_down() {
            &self.counterpart_name
        } else {
            &self.public_name
        }
    }
}

/// One value mapping of an enum converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumCase {
    /// Value name read.
    pub from: String,
    /// Value name written.
    pub to: String,
}

/// Converter between one public enum and its counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumConverter {
    /// Generated function name.
    pub function: String,
    /// Converter kind.
    pub kind: ConverterKind,
    /// Public enum.
    pub enumeration: EnumId,
    /// Next or private enum on the other side.
    pub counterpart: EnumId,
    /// Cases in public declaration order.
    pub cases: Vec<EnumCase>,
    /// Value written when no case matches; Up converters have none and
    /// fail instead.
    pub fallback: Option<String>,
}

/// A generated converter function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "subject")]
pub enum ConverterSpec {
    /// Message converter.
    Message(MessageConverter),
    /// Enum converter.
    Enum(EnumConverter),
}

impl ConverterSpec {
    /// Generated function name.
    #[must_use]
    pub fn function(&self) -> &str {
        match self {
            Self::Message(spec) => &spec.function,
            Self::Enum(spec) => &spec.function,
        }
    }

    /// Converter kind.
    #[must_use]
    pub const fn kind(&self) -> ConverterKind {
        match self {
            Self::Message(spec) => spec.kind,
            Self::Enum(spec) => spec.kind,
        }
    }
}

/// Where a method's request goes after Down conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// The next version's service.
    Next,
    /// The private service, bypassing every later version.
    Private,
    /// The private implementation itself.
    Backend,
}

/// A deprecated request field written straight into the private request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeprecatedInput {
    /// Public field name.
    pub field: String,
    /// Private field name.
    pub private_field: String,
    /// Setter applied to the private request.
    pub setter: String,
    /// Element-wise mapping.
    pub repeated: bool,
    /// Copy or `ToPrivate` call.
    pub action: Action,
}

/// Request handling of one service method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
    /// Method node.
    pub method: MethodId,
    /// Method name.
    pub name: String,
    /// Declared deprecated.
    pub deprecated: bool,
    /// Destination of the converted request.
    pub route: Route,
    /// Request message.
    pub input: MessageId,
    /// Response message.
    pub output: MessageId,
    /// Validator run on the request.
    pub validate: String,
    /// Down converter of the request.
    pub down: Option<String>,
    /// Up converter of the response.
    pub up: Option<String>,
    /// Method invoked on the destination.
    pub target: String,
    /// Deprecated request fields forwarded by side mutators.
    pub deprecated_inputs: Vec<DeprecatedInput>,
}

/// One setter of a mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setter {
    /// Private field written.
    pub field: String,
    /// Setter function name, for example `SetFirstName`.
    pub function: String,
}

/// Out-of-band setters for one private request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutatorSpec {
    /// Private request message.
    pub message: MessageId,
    /// Fully-qualified private message name.
    pub message_name: String,
    /// Setters in first-seen order.
    pub setters: Vec<Setter>,
}

/// Setter name for a private field, for example `SetFirstName`.
#[must_use]
pub fn setter_name(field: &str) -> String {
    let mut name = String::from("Set");
    for part in field.split('_').filter(|part| !part.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name
}
