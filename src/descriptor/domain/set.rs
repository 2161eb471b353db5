//! Serde model of a JSON-encoded `FileDescriptorSet`.
//!
//! Field names follow the protobuf JSON mapping (`messageType`,
//! `oneofDecl`, ...). Custom options stay as raw JSON under their bracketed
//! extension keys so the option carrier can decode them later.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::error::DescriptorResult;

/// Raw option map of a descriptor entity.
///
/// Extension options appear under keys such as `[gen.svc.field]`; standard
/// options such as `deprecated` appear under their plain names.
pub type OptionMap = BTreeMap<String, serde_json::Value>;

/// A set of compiled schema files.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSet {
    /// Files in dependency order.
    #[serde(default)]
    pub file: Vec<FileDescriptor>,
}

impl DescriptorSet {
    /// Parses a descriptor set from its JSON encoding.
    ///
    /// # Errors
    ///
    /// Returns `DescriptorError::Json` when the text is not a valid
    /// descriptor set.
    pub fn from_json(text: &str) -> DescriptorResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One compiled schema file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Path of the schema file.
    #[serde(default)]
    pub name: Option<String>,
    /// Package declared by the file.
    #[serde(default)]
    pub package: Option<String>,
    /// Top-level messages.
    #[serde(default)]
    pub message_type: Vec<MessageDescriptor>,
    /// Top-level enums.
    #[serde(default)]
    pub enum_type: Vec<EnumDescriptor>,
    /// Services.
    #[serde(default)]
    pub service: Vec<ServiceDescriptor>,
    /// Comment locations.
    #[serde(default)]
    pub source_code_info: Option<SourceCodeInfo>,
}

/// A message declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDescriptor {
    /// Simple message name.
    #[serde(default)]
    pub name: Option<String>,
    /// Fields in declaration order.
    #[serde(default)]
    pub field: Vec<FieldDescriptor>,
    /// Nested messages.
    #[serde(default)]
    pub nested_type: Vec<MessageDescriptor>,
    /// Nested enums.
    #[serde(default)]
    pub enum_type: Vec<EnumDescriptor>,
    /// Oneof declarations, indexed by `FieldDescriptor::oneof_index`.
    #[serde(default)]
    pub oneof_decl: Vec<OneofDescriptor>,
    /// Message options.
    #[serde(default)]
    pub options: OptionMap,
}

/// A field declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Field name.
    #[serde(default)]
    pub name: Option<String>,
    /// Field number.
    #[serde(default)]
    pub number: Option<i32>,
    /// Label such as `LABEL_REPEATED`.
    #[serde(default)]
    pub label: Option<String>,
    /// Wire type such as `TYPE_STRING`.
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    /// Referenced message or enum, with a leading dot.
    #[serde(default)]
    pub type_name: Option<String>,
    /// Index into the parent's `oneof_decl`.
    #[serde(default)]
    pub oneof_index: Option<i32>,
    /// Set on proto3 `optional` fields, whose oneof is synthetic.
    #[serde(default)]
    pub proto3_optional: Option<bool>,
    /// Field options.
    #[serde(default)]
    pub options: OptionMap,
}

/// A oneof declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OneofDescriptor {
    /// Oneof name.
    #[serde(default)]
    pub name: Option<String>,
    /// Oneof options.
    #[serde(default)]
    pub options: OptionMap,
}

/// An enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumDescriptor {
    /// Enum name.
    #[serde(default)]
    pub name: Option<String>,
    /// Values in declaration order.
    #[serde(default)]
    pub value: Vec<EnumValueDescriptor>,
    /// Enum options.
    #[serde(default)]
    pub options: OptionMap,
}

/// An enum value declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueDescriptor {
    /// Value name.
    #[serde(default)]
    pub name: Option<String>,
    /// Value number.
    #[serde(default)]
    pub number: Option<i32>,
    /// Value options.
    #[serde(default)]
    pub options: OptionMap,
}

/// A service declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Service name.
    #[serde(default)]
    pub name: Option<String>,
    /// RPC methods.
    #[serde(default)]
    pub method: Vec<MethodDescriptor>,
    /// Service options.
    #[serde(default)]
    pub options: OptionMap,
}

/// An RPC method declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Method name.
    #[serde(default)]
    pub name: Option<String>,
    /// Request message, with a leading dot.
    #[serde(default)]
    pub input_type: Option<String>,
    /// Response message, with a leading dot.
    #[serde(default)]
    pub output_type: Option<String>,
    /// Method options.
    #[serde(default)]
    pub options: OptionMap,
}

/// Source locations carrying comments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCodeInfo {
    /// Location records.
    #[serde(default)]
    pub location: Vec<Location>,
}

/// One source location, addressed by its descriptor path.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Descriptor path, for example `[4, 0, 2, 1]` for the second field of
    /// the first message.
    #[serde(default)]
    pub path: Vec<i32>,
    /// Comment directly above the entity.
    #[serde(default)]
    pub leading_comments: Option<String>,
    /// Comment after the entity.
    #[serde(default)]
    pub trailing_comments: Option<String>,
    /// Detached comment blocks above the entity.
    #[serde(default)]
    pub leading_detached_comments: Vec<String>,
}
