//! Dynamic records the runtime converts and validates.

use std::collections::BTreeMap;

/// A field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// Enum value, by name.
    Enum(String),
    /// Nested message.
    Message(Record),
    /// Repeated field.
    List(Vec<Value>),
    /// The set variant of a oneof.
    Oneof {
        /// Variant field name.
        variant: String,
        /// Variant value.
        value: Box<Value>,
    },
}

impl Value {
    /// True for the zero value of the kind: `false`, `0`, empty strings,
    /// bytes and lists. Messages, enums and oneof variants are never empty
    /// once present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bool(value) => !value,
            Self::Int(value) => *value == 0,
            Self::Uint(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::Str(value) => value.is_empty(),
            Self::Bytes(value) => value.is_empty(),
            Self::List(values) => values.is_empty(),
            Self::Enum(_) | Self::Message(_) | Self::Oneof { .. } => false,
        }
    }

    /// Elements a per-element rule applies to.
    #[must_use]
    pub fn elements(&self) -> Vec<&Self> {
        match self {
            Self::List(values) => values.iter().collect(),
            other => vec![other],
        }
    }

    /// The string content, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }

    /// The nested record, if this is a message.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Message(record) => Some(record),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Self::Message(value)
    }
}

/// A message instance: its fully-qualified name and set fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Fully-qualified message name.
    pub message: String,
    /// Set fields by name; oneofs are keyed by the oneof name.
    pub fields: BTreeMap<String, Value>,
}

impl Record {
    /// Creates an empty record of `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the record with `field` set.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a field.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Reads a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// True when the field is present and not a zero value.
    #[must_use]
    pub fn is_set(&self, field: &str) -> bool {
        self.get(field).is_some_and(|value| !value.is_empty())
    }
}
