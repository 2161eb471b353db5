//! Validation rules derived from declared field constraints.

use std::fmt;

use serde::Serialize;

use crate::chain::{FieldId, MessageId, OneofId};

/// Format classes a string field may be checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    /// RFC 4122 UUID.
    Uuid,
    /// E-mail address.
    Email,
    /// Absolute URL.
    Url,
}

impl Format {
    /// Parses a format keyword, ignoring ASCII case.
    #[must_use]
    pub fn parse(keyword: &str) -> Option<Self> {
        [Self::Uuid, Self::Email, Self::Url]
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(keyword))
    }

    /// Keyword spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Email => "email",
            Self::Url => "url",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Number {
    /// Signed integer bound.
    Int(i64),
    /// Unsigned integer bound, for values beyond `i64::MAX`.
    Uint(u64),
    /// Floating point bound.
    Float(f64),
}

impl Number {
    /// Parses a signed integer, else an unsigned one, else a float.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        text.parse()
            .map(Self::Int)
            .or_else(|_| text.parse().map(Self::Uint))
            .ok()
            .or_else(|| text.parse().ok().map(Self::Float))
    }

    /// The bound as an integer, if it is one.
    #[must_use]
    pub fn as_integer(self) -> Option<i128> {
        match self {
            Self::Int(value) => Some(i128::from(value)),
            Self::Uint(value) => Some(i128::from(value)),
            Self::Float(_) => None,
        }
    }

    /// The bound as a float.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "bounds are compared, not stored")]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Uint(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Uint(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Members of an `in` rule, typed after the field they constrain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "values")]
pub enum MemberSet {
    /// Boolean members.
    Bools(Vec<bool>),
    /// Signed integer members.
    Ints(Vec<i64>),
    /// Unsigned integer members.
    Uints(Vec<u64>),
    /// Floating point members.
    Floats(Vec<f64>),
    /// String members, unquoted.
    Strings(Vec<String>),
    /// Bytes members, compared against their UTF-8 encoding.
    Bytes(Vec<String>),
    /// Enum value names.
    EnumValues(Vec<String>),
}

/// One validation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum Rule {
    /// The field must be set.
    Required,
    /// The nested message must pass its own validator.
    Nested {
        /// Message whose validator is invoked.
        message: MessageId,
    },
    /// The string must match a format class.
    Format {
        /// Format class.
        format: Format,
    },
    /// The value must be one of the members.
    In {
        /// Allowed members.
        members: MemberSet,
    },
    /// The number must lie within the bounds.
    Range {
        /// Inclusive lower bound.
        min: Option<Number>,
        /// Inclusive upper bound.
        max: Option<Number>,
    },
    /// The string length, in characters, must lie within the bounds; a
    /// `max` of zero means unbounded.
    Length {
        /// Inclusive minimum length.
        min: u64,
        /// Inclusive maximum length, zero for none.
        max: u64,
    },
}

/// Ordered rules for one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRules {
    /// Constrained field.
    pub field: FieldId,
    /// Field name.
    pub name: String,
    /// Rules in evaluation order.
    pub rules: Vec<Rule>,
}

/// Required-ness rule of one oneof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneofRules {
    /// Constrained oneof.
    pub oneof: OneofId,
    /// Oneof name.
    pub name: String,
    /// A variant must be set.
    pub required: bool,
}

/// Validator specification of one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRules {
    /// Validated message.
    pub message: MessageId,
    /// Generated function name, for example `ValidateCreateRequest`.
    pub function: String,
    /// Per-field rules, in field order, omitting fields without rules.
    pub fields: Vec<FieldRules>,
    /// Oneof rules.
    pub oneofs: Vec<OneofRules>,
}

impl MessageRules {
    /// Rules of one field, if any.
    #[must_use]
    pub fn rules_for(&self, field: FieldId) -> &[Rule] {
        self.fields
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.rules.as_slice())
            .unwrap_or_default()
    }
}
