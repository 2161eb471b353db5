//! Semantic field kinds.

use std::fmt;

use serde::Serialize;

/// Scalar wire kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 32-bit integer.
    Uint32,
    /// Unsigned 64-bit integer.
    Uint64,
    /// Zig-zag signed 32-bit integer.
    Sint32,
    /// Zig-zag signed 64-bit integer.
    Sint64,
    /// Fixed-width unsigned 32-bit integer.
    Fixed32,
    /// Fixed-width unsigned 64-bit integer.
    Fixed64,
    /// Fixed-width signed 32-bit integer.
    Sfixed32,
    /// Fixed-width signed 64-bit integer.
    Sfixed64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    String,
    /// Raw bytes.
    Bytes,
}

impl ScalarKind {
    /// Parses a descriptor type label such as `TYPE_INT32`.
    #[must_use]
    pub fn from_type_label(label: &str) -> Option<Self> {
        let kind = match label {
            "TYPE_DOUBLE" => Self::Double,
            "TYPE_FLOAT" => Self::Float,
            "TYPE_INT32" => Self::Int32,
            "TYPE_INT64" => Self::Int64,
            "TYPE_UINT32" => Self::Uint32,
            "TYPE_UINT64" => Self::Uint64,
            "TYPE_SINT32" => Self::Sint32,
            "TYPE_SINT64" => Self::Sint64,
            "TYPE_FIXED32" => Self::Fixed32,
            "TYPE_FIXED64" => Self::Fixed64,
            "TYPE_SFIXED32" => Self::Sfixed32,
            "TYPE_SFIXED64" => Self::Sfixed64,
            "TYPE_BOOL" => Self::Bool,
            "TYPE_STRING" => Self::String,
            "TYPE_BYTES" => Self::Bytes,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns true for floating point kinds.
    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Double | Self::Float)
    }

    /// Returns true for integer kinds.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int32
                | Self::Int64
                | Self::Uint32
                | Self::Uint64
                | Self::Sint32
                | Self::Sint64
                | Self::Fixed32
                | Self::Fixed64
                | Self::Sfixed32
                | Self::Sfixed64
        )
    }

    /// Returns true for unsigned integer kinds.
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::Uint32 | Self::Uint64 | Self::Fixed32 | Self::Fixed64)
    }

    /// Returns true for any numeric kind.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        self.is_float() || self.is_integer()
    }

    /// Lower-case label used in diagnostics and generated code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Sint32 => "sint32",
            Self::Sint64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::Sfixed32 => "sfixed32",
            Self::Sfixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }
}

/// Semantic kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "scalar")]
pub enum FieldKind {
    /// A scalar value.
    Scalar(ScalarKind),
    /// A message-typed value.
    Message,
    /// An enum-typed value.
    Enum,
}

impl FieldKind {
    /// Parses a descriptor type label.
    #[must_use]
    pub fn from_type_label(label: &str) -> Option<Self> {
        match label {
            "TYPE_MESSAGE" => Some(Self::Message),
            "TYPE_ENUM" => Some(Self::Enum),
            other => ScalarKind::from_type_label(other).map(Self::Scalar),
        }
    }

    /// Returns the scalar kind, if any.
    #[must_use]
    pub const fn scalar(self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(kind),
            Self::Message | Self::Enum => None,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => f.write_str(kind.as_str()),
            Self::Message => f.write_str("message"),
            Self::Enum => f.write_str("enum"),
        }
    }
}
