//! Ingested, package-grouped schema entities.
//!
//! Names are stored without the leading dot protobuf uses for
//! fully-qualified references. Nested messages and enums are flattened into
//! their package's lists, parents before children, with `local_name`
//! holding the dotted path inside the package (`Person.Employment`).

use serde::Serialize;

use super::kind::FieldKind;
use super::set::OptionMap;

/// Comments attached to one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comments {
    /// Comment block directly above the entity.
    pub leading: String,
    /// Detached comment blocks above the entity.
    pub detached: Vec<String>,
}

impl Comments {
    /// Iterates over every comment line, trimmed.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.leading.as_str())
            .chain(self.detached.iter().map(String::as_str))
            .flat_map(str::lines)
            .map(str::trim)
    }
}

/// Everything an annotation carrier may read for one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Carrier {
    /// Entity comments.
    pub comments: Comments,
    /// Entity options.
    pub options: OptionMap,
}

impl Carrier {
    /// Creates a carrier from leading comment text only.
    #[must_use]
    pub fn from_comment(leading: impl Into<String>) -> Self {
        Self {
            comments: Comments {
                leading: leading.into(),
                detached: Vec::new(),
            },
            options: OptionMap::new(),
        }
    }

    /// Creates a carrier from options only.
    #[must_use]
    pub fn from_options(options: OptionMap) -> Self {
        Self {
            comments: Comments::default(),
            options,
        }
    }
}

/// All entities declared under one package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PackageSchema {
    /// Package name, for example `people.v1`.
    pub name: String,
    /// Services declared in the package.
    pub services: Vec<ServiceSchema>,
    /// Messages, flattened, parents before children.
    pub messages: Vec<MessageSchema>,
    /// Enums, flattened, in declaration order.
    pub enums: Vec<EnumSchema>,
}

/// A service declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceSchema {
    /// Simple service name.
    pub name: String,
    /// RPC methods in declaration order.
    pub methods: Vec<MethodSchema>,
    /// Annotation carrier.
    pub carrier: Carrier,
}

/// An RPC method.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MethodSchema {
    /// Method name.
    pub name: String,
    /// Fully-qualified request message name.
    pub input: String,
    /// Fully-qualified response message name.
    pub output: String,
    /// Annotation carrier.
    pub carrier: Carrier,
}

/// A message declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MessageSchema {
    /// Simple name.
    pub name: String,
    /// Dotted path inside the package.
    pub local_name: String,
    /// Fully-qualified name.
    pub full_name: String,
    /// Local name of the enclosing message, for nested declarations.
    pub parent: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSchema>,
    /// Oneofs, excluding the synthetic ones behind proto3 `optional`.
    pub oneofs: Vec<OneofSchema>,
    /// Annotation carrier.
    pub carrier: Carrier,
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Field number.
    pub number: i32,
    /// Semantic kind.
    pub kind: FieldKind,
    /// Whether the field is repeated.
    pub repeated: bool,
    /// Fully-qualified referenced type for message and enum fields.
    pub type_name: Option<String>,
    /// Index into the parent's `oneofs`.
    pub oneof: Option<usize>,
    /// Annotation carrier.
    pub carrier: Carrier,
}

/// A oneof declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OneofSchema {
    /// Oneof name.
    pub name: String,
    /// Annotation carrier.
    pub carrier: Carrier,
}

/// An enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumSchema {
    /// Simple name.
    pub name: String,
    /// Dotted path inside the package.
    pub local_name: String,
    /// Fully-qualified name.
    pub full_name: String,
    /// Local name of the enclosing message, for nested declarations.
    pub parent: Option<String>,
    /// Values in declaration order.
    pub values: Vec<EnumValueSchema>,
    /// Annotation carrier.
    pub carrier: Carrier,
}

/// An enum value declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnumValueSchema {
    /// Value name.
    pub name: String,
    /// Value number.
    pub number: i32,
    /// Annotation carrier.
    pub carrier: Carrier,
}
