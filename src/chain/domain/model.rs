//! Arena model of the version chain.
//!
//! Versions are stored in delegation order: index 0 is the oldest public
//! version and the last slot is the private service. Every correspondence
//! is an index link, so the chain is one-directional by construction.
//! A [`Chain`] is only ever handed out fully resolved; nodes are read
//! through shared references.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ids::{EnumId, EnumValueId, FieldId, MessageId, MethodId, OneofId, VersionId};
use super::propagation::Propagation;
use crate::descriptor::{FieldKind, ValidateDirectives};

/// One service version in the chain.
#[derive(Debug, Clone, Serialize)]
pub struct Version {
    /// Arena slot.
    pub id: VersionId,
    /// Schema package, for example `people.v1`.
    pub package: String,
    /// Simple service name.
    pub service: String,
    /// Terminal implementation-facing version.
    pub is_private: bool,
    /// Public version adjacent to the private service.
    pub is_latest: bool,
    /// Following version in the chain.
    pub next: Option<VersionId>,
    /// Terminal private version; `None` only on the private version itself.
    pub private: Option<VersionId>,
    /// Messages owned by this version.
    pub messages: Vec<MessageId>,
    /// Enums owned by this version.
    pub enums: Vec<EnumId>,
    /// Methods of the version's service.
    pub methods: Vec<MethodId>,
    #[serde(skip)]
    pub(crate) message_index: BTreeMap<String, MessageId>,
    #[serde(skip)]
    pub(crate) enum_index: BTreeMap<String, EnumId>,
    #[serde(skip)]
    pub(crate) method_index: BTreeMap<String, MethodId>,
}

impl Version {
    /// Short name of the version: the last package segment.
    #[must_use]
    pub fn short_name(&self) -> &str {
        self.package.rsplit('.').next().unwrap_or(&self.package)
    }
}

/// Type referenced by a message or enum field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    /// A message owned by a chain version.
    Message(MessageId),
    /// An enum owned by a chain version.
    Enum(EnumId),
    /// A type outside the chain, by fully-qualified name.
    External(String),
}

/// A message node.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Arena slot.
    pub id: MessageId,
    /// Owning version.
    pub version: VersionId,
    /// Simple name.
    pub name: String,
    /// Dotted path inside the package.
    pub local_name: String,
    /// Fully-qualified name.
    pub full_name: String,
    /// Enclosing message.
    pub parent: Option<MessageId>,
    /// Fields in declaration order, oneof variants included.
    pub fields: Vec<FieldId>,
    /// Oneofs in declaration order.
    pub oneofs: Vec<OneofId>,
    /// Declared deprecated.
    pub deprecated: bool,
    /// Explicit delegate name.
    pub delegate: Option<String>,
    /// Used as an RPC request.
    pub is_input: bool,
    /// Used as an RPC response.
    pub is_output: bool,
    /// Counterpart in the next version.
    pub next: Option<MessageId>,
    /// Counterpart in the private version.
    pub private: Option<MessageId>,
}

/// A field node.
#[derive(Debug, Clone, Serialize)]
pub struct Field {
    /// Arena slot.
    pub id: FieldId,
    /// Owning message.
    pub message: MessageId,
    /// Field name.
    pub name: String,
    /// Field number.
    pub number: i32,
    /// Semantic kind.
    pub kind: FieldKind,
    /// Repeated flag.
    pub repeated: bool,
    /// Referenced message or enum.
    pub type_ref: Option<TypeRef>,
    /// Owning oneof for variant fields.
    pub oneof: Option<OneofId>,
    /// Declared deprecated, or inherited from a deprecated message.
    pub deprecated: bool,
    /// Explicit delegate name.
    pub delegate: Option<String>,
    /// Declared validation directives.
    pub validate: ValidateDirectives,
    /// Must be set on the record being received during Up conversion.
    pub receive_required: bool,
    /// Counterpart in the next version.
    pub next: Option<FieldId>,
    /// Counterpart in the private version.
    pub private: Option<FieldId>,
    /// Classification against the hop counterpart.
    pub propagation: Propagation,
}

impl Field {
    /// True when the field is a trivial scalar copy across its hop.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.propagation.is_match()
    }

    /// Counterpart used by the field's hop: next, or private on bypass.
    #[must_use]
    pub const fn counterpart(&self) -> Option<FieldId> {
        match self.next {
            Some(next) => Some(next),
            None => self.private,
        }
    }
}

/// A oneof node.
#[derive(Debug, Clone, Serialize)]
pub struct Oneof {
    /// Arena slot.
    pub id: OneofId,
    /// Owning message.
    pub message: MessageId,
    /// Oneof name.
    pub name: String,
    /// Variant fields.
    pub fields: Vec<FieldId>,
    /// Declared deprecated, or inherited from a deprecated message.
    pub deprecated: bool,
    /// Explicit delegate name.
    pub delegate: Option<String>,
    /// Exactly one variant must be set on validated input.
    pub required: bool,
    /// A variant must be set on the record being received.
    pub receive_required: bool,
    /// Counterpart in the next version.
    pub next: Option<OneofId>,
    /// Counterpart in the private version.
    pub private: Option<OneofId>,
}

/// An enum node.
#[derive(Debug, Clone, Serialize)]
pub struct Enum {
    /// Arena slot.
    pub id: EnumId,
    /// Owning version.
    pub version: VersionId,
    /// Simple name.
    pub name: String,
    /// Dotted path inside the package.
    pub local_name: String,
    /// Fully-qualified name.
    pub full_name: String,
    /// Enclosing message.
    pub parent: Option<MessageId>,
    /// Values in declaration order.
    pub values: Vec<EnumValueId>,
    /// Declared deprecated, or only referenced from deprecated messages.
    pub deprecated: bool,
    /// Explicit delegate name.
    pub delegate: Option<String>,
    /// Counterpart in the next version.
    pub next: Option<EnumId>,
    /// Counterpart in the private version.
    pub private: Option<EnumId>,
}

/// An enum value node.
#[derive(Debug, Clone, Serialize)]
pub struct EnumValue {
    /// Arena slot.
    pub id: EnumValueId,
    /// Owning enum.
    pub enumeration: EnumId,
    /// Value name.
    pub name: String,
    /// Value number.
    pub number: i32,
    /// Declared deprecated, or inherited from a deprecated enum.
    pub deprecated: bool,
    /// Explicit delegate name.
    pub delegate: Option<String>,
    /// Source value names declared to fold into this value.
    pub receive: Vec<String>,
    /// Canonical delegate in the next version.
    pub next: Option<EnumValueId>,
    /// Canonical delegate in the private version.
    pub private: Option<EnumValueId>,
}

/// An RPC method node.
#[derive(Debug, Clone, Serialize)]
pub struct Method {
    /// Arena slot.
    pub id: MethodId,
    /// Owning version.
    pub version: VersionId,
    /// Method name.
    pub name: String,
    /// Request message.
    pub input: MessageId,
    /// Response message.
    pub output: MessageId,
    /// Declared deprecated.
    pub deprecated: bool,
    /// Explicit delegate name.
    pub delegate: Option<String>,
    /// Counterpart in the next version.
    pub next: Option<MethodId>,
    /// Counterpart in the private version.
    pub private: Option<MethodId>,
}

/// The resolved version chain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Chain {
    pub(crate) versions: Vec<Version>,
    pub(crate) messages: Vec<Message>,
    pub(crate) fields: Vec<Field>,
    pub(crate) oneofs: Vec<Oneof>,
    pub(crate) enums: Vec<Enum>,
    pub(crate) values: Vec<EnumValue>,
    pub(crate) methods: Vec<Method>,
}

macro_rules! lookup_mut {
    ($fn_name:ident, $field:ident, $id:ty, $node:ty) => {
        pub(crate) fn $fn_name(&mut self, id: $id) -> &mut $node {
            &mut self.$field[id.index()]
        }
    };
}

macro_rules! lookup {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $id:ty, $node:ty) => {
        $(#[$meta])*
        ///
        /// Ids are only minted by the builder of this chain, so every id
        /// handed out by the chain resolves.
        #[must_use]
        pub fn $fn_name(&self, id: $id) -> &$node {
            &self.$field[id.index()]
        }
    };
}

#[expect(
    clippy::indexing_slicing,
    reason = "arena ids are minted by the chain builder and always in bounds"
)]
impl Chain {
    lookup!(
        /// Returns a version node.
        version,
        versions,
        VersionId,
        Version
    );
    lookup!(
        /// Returns a message node.
        message,
        messages,
        MessageId,
        Message
    );
    lookup!(
        /// Returns a field node.
        field,
        fields,
        FieldId,
        Field
    );
    lookup!(
        /// Returns a oneof node.
        oneof,
        oneofs,
        OneofId,
        Oneof
    );
    lookup!(
        /// Returns an enum node.
        enumeration,
        enums,
        EnumId,
        Enum
    );
    lookup!(
        /// Returns an enum value node.
        value,
        values,
        EnumValueId,
        EnumValue
    );
    lookup!(
        /// Returns a method node.
        method,
        methods,
        MethodId,
        Method
    );

    lookup_mut!(version_mut, versions, VersionId, Version);
    lookup_mut!(message_mut, messages, MessageId, Message);
    lookup_mut!(field_mut, fields, FieldId, Field);
    lookup_mut!(oneof_mut, oneofs, OneofId, Oneof);
    lookup_mut!(enum_mut, enums, EnumId, Enum);
    lookup_mut!(value_mut, values, EnumValueId, EnumValue);
    lookup_mut!(method_mut, methods, MethodId, Method);
}

impl Chain {
    /// Versions in delegation order, private last.
    #[must_use]
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Public versions in delegation order.
    pub fn public_versions(&self) -> impl Iterator<Item = &Version> {
        self.versions.iter().filter(|version| !version.is_private)
    }

    /// The terminal private version.
    #[must_use]
    pub fn private_version(&self) -> Option<&Version> {
        self.versions.last()
    }

    /// Finds a version by package name.
    #[must_use]
    pub fn version_by_package(&self, package: &str) -> Option<&Version> {
        self.versions.iter().find(|version| version.package == package)
    }

    /// Finds a message of `version` by its dotted local name.
    #[must_use]
    pub fn find_message(&self, version: VersionId, local_name: &str) -> Option<MessageId> {
        self.version(version).message_index.get(local_name).copied()
    }

    /// Finds an enum of `version` by its dotted local name.
    #[must_use]
    pub fn find_enum(&self, version: VersionId, local_name: &str) -> Option<EnumId> {
        self.version(version).enum_index.get(local_name).copied()
    }

    /// Finds a method of `version` by name.
    #[must_use]
    pub fn find_method(&self, version: VersionId, name: &str) -> Option<MethodId> {
        self.version(version).method_index.get(name).copied()
    }

    /// Finds a field of `message` by name.
    #[must_use]
    pub fn find_field(&self, message: MessageId, name: &str) -> Option<FieldId> {
        self.message(message)
            .fields
            .iter()
            .copied()
            .find(|id| self.field(*id).name == name)
    }

    /// Finds a oneof of `message` by name.
    #[must_use]
    pub fn find_oneof(&self, message: MessageId, name: &str) -> Option<OneofId> {
        self.message(message)
            .oneofs
            .iter()
            .copied()
            .find(|id| self.oneof(*id).name == name)
    }

    /// Finds a value of `enumeration` by name.
    #[must_use]
    pub fn find_value(&self, enumeration: EnumId, name: &str) -> Option<EnumValueId> {
        self.enumeration(enumeration)
            .values
            .iter()
            .copied()
            .find(|id| self.value(*id).name == name)
    }

    /// Fields of `message` outside any oneof.
    pub fn plain_fields(&self, message: MessageId) -> impl Iterator<Item = &Field> {
        self.message(message)
            .fields
            .iter()
            .map(|id| self.field(*id))
            .filter(|field| field.oneof.is_none())
    }

    /// Fully-qualified name of a field, for diagnostics.
    #[must_use]
    pub fn field_path(&self, field: FieldId) -> String {
        let node = self.field(field);
        format!("{}.{}", self.message(node.message).full_name, node.name)
    }

    /// Package owning a message.
    #[must_use]
    pub fn message_package(&self, message: MessageId) -> &str {
        &self.version(self.message(message).version).package
    }

    /// Package owning an enum.
    #[must_use]
    pub fn enum_package(&self, enumeration: EnumId) -> &str {
        &self.version(self.enumeration(enumeration).version).package
    }

    /// Identifier used to name generated functions for a message or enum:
    /// the local name with nesting dots replaced by underscores.
    #[must_use]
    pub fn type_ident(local_name: &str) -> String {
        local_name.replace('.', "_")
    }
}
