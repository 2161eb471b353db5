//! Annotation carrier reading typed `gen.svc` option extensions.
//!
//! Each entity kind has its own extension key. The payload shape is shared:
//!
//! ```json
//! {
//!   "delegate": { "name": "FullName" },
//!   "deprecated": true,
//!   "validate": { "required": true, "min": 1, "max": "64", "in": ["a", "b"], "is": "uuid" },
//!   "receive": { "required": true, "names": ["PART_TIME"] }
//! }
//! ```
//!
//! Bounds and members may be JSON numbers, booleans or strings; the
//! protobuf JSON mapping writes 64-bit integers as strings.

use serde::Deserialize;
use serde_json::Value;

use crate::descriptor::{
    domain::Carrier,
    error::AnnotationError,
    ports::{AnnotationResult, AnnotationSource, EntityKind, ReceiveDirectives, ValidateDirectives},
};

/// Annotation source backed by typed option extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionAnnotations;

impl OptionAnnotations {
    /// Creates the option carrier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Extension key holding the annotations of `kind`.
    #[must_use]
    pub const fn extension_key(kind: EntityKind) -> &'static str {
        match kind {
            EntityKind::Message => "[gen.svc.message]",
            EntityKind::Field => "[gen.svc.field]",
            EntityKind::Oneof => "[gen.svc.oneof]",
            EntityKind::Enum => "[gen.svc.enum]",
            EntityKind::EnumValue => "[gen.svc.enum_value]",
            EntityKind::Method => "[gen.svc.method]",
        }
    }

    fn decode(kind: EntityKind, carrier: &Carrier) -> AnnotationResult<Extension> {
        let key = Self::extension_key(kind);
        carrier.options.get(key).map_or_else(
            || Ok(Extension::default()),
            |value| {
                Extension::deserialize(value).map_err(|err| AnnotationError::InvalidOption {
                    extension: key.to_owned(),
                    message: err.to_string(),
                })
            },
        )
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Extension {
    delegate: Option<DelegateOption>,
    deprecated: bool,
    validate: Option<ValidateOption>,
    receive: Option<ReceiveOption>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DelegateOption {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ValidateOption {
    required: bool,
    min: Option<Value>,
    max: Option<Value>,
    #[serde(rename = "in")]
    members: Option<Vec<Value>>,
    is: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ReceiveOption {
    required: bool,
    names: Vec<String>,
}

/// Renders a JSON literal the way it would be written in a comment
/// directive.
fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl AnnotationSource for OptionAnnotations {
    fn delegate_name(
        &self,
        kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<Option<String>> {
        Ok(Self::decode(kind, carrier)?
            .delegate
            .map(|delegate| delegate.name)
            .filter(|name| !name.is_empty()))
    }

    fn deprecated(&self, kind: EntityKind, carrier: &Carrier) -> AnnotationResult<bool> {
        Ok(Self::decode(kind, carrier)?.deprecated)
    }

    fn validate_directives(
        &self,
        kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<ValidateDirectives> {
        let Some(validate) = Self::decode(kind, carrier)?.validate else {
            return Ok(ValidateDirectives::default());
        };
        Ok(ValidateDirectives {
            required: validate.required,
            min: validate.min.as_ref().map(literal),
            max: validate.max.as_ref().map(literal),
            members: validate
                .members
                .map(|members| members.iter().map(literal).collect()),
            format: validate.is,
        })
    }

    fn receive_directives(
        &self,
        kind: EntityKind,
        carrier: &Carrier,
    ) -> AnnotationResult<ReceiveDirectives> {
        Ok(Self::decode(kind, carrier)?
            .receive
            .map(|receive| ReceiveDirectives {
                required: receive.required,
                names: receive.names,
            })
            .unwrap_or_default())
    }
}
