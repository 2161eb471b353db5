//! Derives ordered rule lists from declared field directives.
//!
//! Rules are emitted in a fixed order: required, nested, format,
//! membership, then range or length. Malformed directives are errors; none
//! are skipped.

use std::collections::HashSet;

use crate::chain::{Chain, FieldId, MessageId, TypeRef, VersionId};
use crate::descriptor::{FieldKind, ScalarKind};
use crate::validation::{
    domain::{FieldRules, Format, MemberSet, MessageRules, Number, OneofRules, Rule},
    error::{RuleError, RuleResult},
};

/// Derives validator specifications over a resolved chain.
#[derive(Debug)]
pub struct RuleDeriver<'a> {
    chain: &'a Chain,
    requires: HashSet<MessageId>,
    validated: HashSet<MessageId>,
}

impl<'a> RuleDeriver<'a> {
    /// Creates a deriver, computing which messages require validation.
    ///
    /// A message requires validation when it is an RPC request or
    /// response, declares a directive on a field or oneof, or contains a
    /// message field whose type requires validation.
    #[must_use]
    pub fn new(chain: &'a Chain) -> Self {
        let mut requires: HashSet<MessageId> = chain
            .messages
            .iter()
            .filter(|message| {
                message.is_input
                    || message.is_output
                    || message
                        .fields
                        .iter()
                        .any(|id| chain.field(*id).validate.is_declared())
                    || message.oneofs.iter().any(|id| chain.oneof(*id).required)
            })
            .map(|message| message.id)
            .collect();
        loop {
            let added: Vec<MessageId> = chain
                .messages
                .iter()
                .filter(|message| !requires.contains(&message.id))
                .filter(|message| {
                    message.fields.iter().any(|id| {
                        matches!(chain.field(*id).type_ref, Some(TypeRef::Message(nested)) if requires.contains(&nested))
                    })
                })
                .map(|message| message.id)
                .collect();
            if added.is_empty() {
                break;
            }
            requires.extend(added);
        }
        let validated = validated_messages(chain, &requires);
        Self {
            chain,
            requires,
            validated,
        }
    }

    /// Whether `message` requires validation.
    #[must_use]
    pub fn requires_validation(&self, message: MessageId) -> bool {
        self.requires.contains(&message)
    }

    /// Whether a validator function is generated for `message`.
    ///
    /// Requests and messages no method uses get one, as does every message
    /// a validated message reaches through a nested rule. Messages only
    /// ever returned as responses get none.
    #[must_use]
    pub fn has_validator(&self, message: MessageId) -> bool {
        self.validated.contains(&message)
    }

    /// Validator specifications for every validated message of a version.
    ///
    /// # Errors
    ///
    /// Returns the first malformed directive.
    pub fn derive_version(&self, version: VersionId) -> RuleResult<Vec<MessageRules>> {
        self.chain
            .version(version)
            .messages
            .iter()
            .copied()
            .filter(|message| self.has_validator(*message))
            .map(|message| self.derive_message(message))
            .collect()
    }

    /// Validator specification of one message.
    ///
    /// # Errors
    ///
    /// Returns the first malformed directive.
    pub fn derive_message(&self, message: MessageId) -> RuleResult<MessageRules> {
        let node = self.chain.message(message);
        let mut fields = Vec::new();
        for id in &node.fields {
            let rules = self.derive_field(*id)?;
            if !rules.is_empty() {
                fields.push(FieldRules {
                    field: *id,
                    name: self.chain.field(*id).name.clone(),
                    rules,
                });
            }
        }
        let oneofs = node
            .oneofs
            .iter()
            .map(|id| self.chain.oneof(*id))
            .filter(|oneof| oneof.required)
            .map(|oneof| OneofRules {
                oneof: oneof.id,
                name: oneof.name.clone(),
                required: true,
            })
            .collect();
        Ok(MessageRules {
            message,
            function: format!("Validate{}", Chain::type_ident(&node.local_name)),
            fields,
            oneofs,
        })
    }

    /// Ordered rules of one field.
    ///
    /// # Errors
    ///
    /// Returns `RuleError` naming the field when a directive is malformed.
    pub fn derive_field(&self, id: FieldId) -> RuleResult<Vec<Rule>> {
        let field = self.chain.field(id);
        let directives = &field.validate;
        let path = self.chain.field_path(id);
        let mut rules = Vec::new();

        if directives.required {
            rules.push(Rule::Required);
        }
        if let Some(TypeRef::Message(nested)) = field.type_ref {
            if self.requires_validation(nested) {
                rules.push(Rule::Nested { message: nested });
            }
        }
        if let Some(keyword) = &directives.format {
            rules.push(format_rule(&path, field.kind, keyword)?);
        }
        if let Some(members) = &directives.members {
            rules.push(Rule::In {
                members: self.member_set(&path, id, members)?,
            });
        }
        if directives.min.is_some() || directives.max.is_some() {
            rules.push(range_rule(
                &path,
                field.kind,
                directives.min.as_deref(),
                directives.max.as_deref(),
            )?);
        }
        Ok(rules)
    }

    fn member_set(&self, path: &str, id: FieldId, members: &[String]) -> RuleResult<MemberSet> {
        let field = self.chain.field(id);
        if let Some(TypeRef::Enum(enumeration)) = field.type_ref {
            let mut names = Vec::with_capacity(members.len());
            for member in members {
                let name = unquote(member).unwrap_or(member);
                if self.chain.find_value(enumeration, name).is_none() {
                    return Err(RuleError::UnknownEnumMember {
                        field: path.to_owned(),
                        member: member.clone(),
                        enumeration: self.chain.enumeration(enumeration).full_name.clone(),
                    });
                }
                names.push(name.to_owned());
            }
            return Ok(MemberSet::EnumValues(names));
        }
        literal_members(path, field.kind, members)
    }
}

/// Roots are requests and unused messages; nested rules pull in the
/// message types they point at.
fn validated_messages(chain: &Chain, requires: &HashSet<MessageId>) -> HashSet<MessageId> {
    let mut validated: HashSet<MessageId> = chain
        .messages
        .iter()
        .filter(|message| message.is_input || !message.is_output)
        .map(|message| message.id)
        .collect();
    let mut pending: Vec<MessageId> = validated.iter().copied().collect();
    while let Some(message) = pending.pop() {
        for id in &chain.message(message).fields {
            if let Some(TypeRef::Message(nested)) = chain.field(*id).type_ref {
                if requires.contains(&nested) && validated.insert(nested) {
                    pending.push(nested);
                }
            }
        }
    }
    validated
}

fn format_rule(path: &str, kind: FieldKind, keyword: &str) -> RuleResult<Rule> {
    let format = Format::parse(keyword).ok_or_else(|| RuleError::UnknownFormat {
        field: path.to_owned(),
        value: keyword.to_owned(),
    })?;
    if kind != FieldKind::Scalar(ScalarKind::String) {
        return Err(RuleError::FormatOnNonString {
            field: path.to_owned(),
            format: format.to_string(),
            kind: kind.to_string(),
        });
    }
    Ok(Rule::Format { format })
}

fn unquote(member: &str) -> Option<&str> {
    member
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
}

/// Types `in` members after the field. String and bytes fields accept
/// members quoted or bare, since option carriers hand strings over without
/// quotes. Integer members follow the field's signedness.
fn literal_members(path: &str, kind: FieldKind, members: &[String]) -> RuleResult<MemberSet> {
    let written = members.join(",");
    let mismatch = || RuleError::MembersKindMismatch {
        field: path.to_owned(),
        members: written.clone(),
        kind: kind.to_string(),
    };
    let unquoted = || -> Vec<String> {
        members
            .iter()
            .map(|member| unquote(member).unwrap_or(member).to_owned())
            .collect()
    };
    let scalar = kind.scalar();
    match scalar {
        Some(ScalarKind::String) => return Ok(MemberSet::Strings(unquoted())),
        Some(ScalarKind::Bytes) => return Ok(MemberSet::Bytes(unquoted())),
        _ => {}
    }

    if let Some(bools) = members
        .iter()
        .map(|member| member.parse::<bool>().ok())
        .collect::<Option<Vec<_>>>()
    {
        return match scalar {
            Some(ScalarKind::Bool) => Ok(MemberSet::Bools(bools)),
            _ => Err(mismatch()),
        };
    }
    if let Some(integers) = members
        .iter()
        .map(|member| member.parse::<i128>().ok())
        .collect::<Option<Vec<_>>>()
    {
        return match scalar {
            Some(element) if element.is_unsigned() => integers
                .into_iter()
                .map(|value| u64::try_from(value).ok())
                .collect::<Option<Vec<_>>>()
                .map(MemberSet::Uints)
                .ok_or_else(mismatch),
            Some(element) if element.is_integer() => integers
                .into_iter()
                .map(|value| i64::try_from(value).ok())
                .collect::<Option<Vec<_>>>()
                .map(MemberSet::Ints)
                .ok_or_else(mismatch),
            Some(element) if element.is_float() => float_members(members).ok_or_else(mismatch),
            _ => Err(mismatch()),
        };
    }
    if let Some(floats) = float_members(members) {
        return match scalar {
            Some(element) if element.is_float() => Ok(floats),
            _ => Err(mismatch()),
        };
    }
    if members.iter().all(|member| unquote(member).is_some()) {
        return Err(mismatch());
    }
    Err(RuleError::MixedMembers {
        field: path.to_owned(),
        members: written,
    })
}

fn float_members(members: &[String]) -> Option<MemberSet> {
    members
        .iter()
        .map(|member| member.parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()
        .map(MemberSet::Floats)
}

fn parse_bound(path: &str, key: &'static str, raw: Option<&str>) -> RuleResult<Option<Number>> {
    raw.map(|text| {
        Number::parse(text).ok_or_else(|| RuleError::InvalidBound {
            field: path.to_owned(),
            key,
            value: text.to_owned(),
        })
    })
    .transpose()
}

fn range_rule(
    path: &str,
    kind: FieldKind,
    min_raw: Option<&str>,
    max_raw: Option<&str>,
) -> RuleResult<Rule> {
    let min = parse_bound(path, "min", min_raw)?;
    let max = parse_bound(path, "max", max_raw)?;
    let mismatch = |key: &'static str, value: Option<&str>| RuleError::BoundKindMismatch {
        field: path.to_owned(),
        key,
        value: value.unwrap_or_default().to_owned(),
        kind: kind.to_string(),
    };

    match kind.scalar() {
        Some(ScalarKind::String) => {
            let length = |key: &'static str, bound: Option<Number>, raw: Option<&str>| match bound
            {
                None => Ok(0),
                Some(Number::Int(value)) => u64::try_from(value).map_err(|_| mismatch(key, raw)),
                Some(Number::Uint(value)) => Ok(value),
                Some(Number::Float(_)) => Err(mismatch(key, raw)),
            };
            Ok(Rule::Length {
                min: length("min", min, min_raw)?,
                max: length("max", max, max_raw)?,
            })
        }
        Some(scalar) if scalar.is_integer() => {
            let integer = |key: &'static str, bound: Option<Number>, raw: Option<&str>| match bound
            {
                None => Ok(None),
                Some(Number::Float(_)) => Err(mismatch(key, raw)),
                Some(Number::Int(value)) if scalar.is_unsigned() => u64::try_from(value)
                    .map(|value| Some(Number::Uint(value)))
                    .map_err(|_| mismatch(key, raw)),
                Some(Number::Uint(_)) if !scalar.is_unsigned() => Err(mismatch(key, raw)),
                Some(other) => Ok(Some(other)),
            };
            Ok(Rule::Range {
                min: integer("min", min, min_raw)?,
                max: integer("max", max, max_raw)?,
            })
        }
        Some(scalar) if scalar.is_float() => Ok(Rule::Range {
            min: min.map(|bound| Number::Float(bound.as_f64())),
            max: max.map(|bound| Number::Float(bound.as_f64())),
        }),
        _ => Err(RuleError::RangeOnUnsupportedKind {
            field: path.to_owned(),
            kind: kind.to_string(),
        }),
    }
}
