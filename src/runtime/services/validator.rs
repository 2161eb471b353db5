//! Executes the validator specs of one version against dynamic records.

use std::cmp::Ordering;

use regex::Regex;
use url::Url;
use uuid::Uuid;

use crate::chain::{Chain, FieldId};
use crate::plan::VersionPlan;
use crate::runtime::domain::{Record, Status, Value};
use crate::validation::{Format, MemberSet, MessageRules, Number, Rule};

/// Pattern accepted for `email` formatted fields.
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// The generated validator of one version.
#[derive(Debug, Clone)]
pub struct Validator<'p> {
    chain: &'p Chain,
    plan: &'p VersionPlan,
    email: Regex,
}

impl<'p> Validator<'p> {
    /// Creates the validator of `plan`.
    #[must_use]
    pub const fn new(chain: &'p Chain, plan: &'p VersionPlan, email: Regex) -> Self {
        Self { chain, plan, email }
    }

    /// Runs validator `function` on `input`. Empty optional values pass
    /// every rule except `required`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` naming the first failing field, or
    /// `Internal` when `function` does not exist.
    pub fn validate(&self, function: &str, input: &Record) -> Result<(), Status> {
        let rules = self.rules(function)?;
        for field in &rules.fields {
            let value = self.field_value(input, field.field, &field.name);
            for rule in &field.rules {
                self.check(&field.name, rule, value)?;
            }
        }
        for oneof in rules.oneofs.iter().filter(|oneof| oneof.required) {
            if input.get(&oneof.name).is_none() {
                return Err(Status::invalid_argument(format!("{} is required", oneof.name)));
            }
        }
        Ok(())
    }

    fn rules(&self, function: &str) -> Result<&'p MessageRules, Status> {
        self.plan.validator(function).ok_or_else(|| {
            Status::internal(format!("{} has no validator {function}", self.plan.package))
        })
    }

    /// Oneof variants live under their oneof's name.
    fn field_value<'r>(
        &self,
        input: &'r Record,
        field: FieldId,
        name: &str,
    ) -> Option<&'r Value> {
        let Some(oneof) = self.chain.field(field).oneof else {
            return input.get(name);
        };
        match input.get(&self.chain.oneof(oneof).name) {
            Some(Value::Oneof { variant, value }) if variant == name => Some(value.as_ref()),
            _ => None,
        }
    }

    fn check(&self, name: &str, rule: &Rule, value: Option<&Value>) -> Result<(), Status> {
        let present = value.filter(|value| !value.is_empty());
        if matches!(rule, Rule::Required) {
            return present
                .map(|_| ())
                .ok_or_else(|| Status::invalid_argument(format!("{name} is required")));
        }
        let Some(value) = present else {
            return Ok(());
        };
        value
            .elements()
            .into_iter()
            .try_for_each(|element| self.check_element(name, rule, element))
    }

    fn check_element(&self, name: &str, rule: &Rule, element: &Value) -> Result<(), Status> {
        match rule {
            Rule::Required => Ok(()),
            Rule::Nested { message } => {
                let function = format!(
                    "Validate{}",
                    Chain::type_ident(&self.chain.message(*message).local_name)
                );
                element
                    .as_record()
                    .map_or(Ok(()), |record| self.validate(&function, record))
            }
            Rule::Format { format } => {
                let text = element.as_str().unwrap_or_default();
                let valid = match format {
                    Format::Uuid => Uuid::parse_str(text).is_ok(),
                    Format::Email => self.email.is_match(text),
                    Format::Url => Url::parse(text).is_ok(),
                };
                valid.then_some(()).ok_or_else(|| {
                    Status::invalid_argument(format!("{name} must be a valid {format}"))
                })
            }
            Rule::In { members } => contains(members, element).then_some(()).ok_or_else(|| {
                Status::invalid_argument(format!("{name} must be one of the allowed values"))
            }),
            Rule::Range { min, max } => {
                let below =
                    min.is_some_and(|bound| compare(element, bound) == Some(Ordering::Less));
                let above =
                    max.is_some_and(|bound| compare(element, bound) == Some(Ordering::Greater));
                if below || above {
                    return Err(Status::invalid_argument(format!(
                        "{name} is out of range{}{}",
                        min.map(|bound| format!(", min {bound}")).unwrap_or_default(),
                        max.map(|bound| format!(", max {bound}")).unwrap_or_default(),
                    )));
                }
                Ok(())
            }
            Rule::Length { min, max } => {
                let count = element.as_str().map_or(0, |text| text.chars().count());
                let length = u64::try_from(count).unwrap_or(u64::MAX);
                if length < *min || (*max > 0 && length > *max) {
                    return Err(Status::invalid_argument(format!(
                        "{name} has an invalid length"
                    )));
                }
                Ok(())
            }
        }
    }
}

#[expect(clippy::float_arithmetic, reason = "float members match within epsilon")]
fn contains(members: &MemberSet, element: &Value) -> bool {
    match (members, element) {
        (MemberSet::Bools(values), Value::Bool(value)) => values.contains(value),
        (MemberSet::Ints(values), Value::Int(value)) => values.contains(value),
        (MemberSet::Ints(values), Value::Uint(value)) => {
            i64::try_from(*value).is_ok_and(|signed| values.contains(&signed))
        }
        (MemberSet::Uints(values), Value::Uint(value)) => values.contains(value),
        (MemberSet::Uints(values), Value::Int(value)) => {
            u64::try_from(*value).is_ok_and(|unsigned| values.contains(&unsigned))
        }
        (MemberSet::Bytes(values), Value::Bytes(value)) => {
            values.iter().any(|member| member.as_bytes() == value.as_slice())
        }
        (MemberSet::Floats(values), Value::Float(value)) => values
            .iter()
            .any(|member| (member - value).abs() <= f64::EPSILON),
        (MemberSet::Strings(values), Value::Str(value))
        | (MemberSet::EnumValues(values), Value::Enum(value)) => values.contains(value),
        _ => false,
    }
}

/// Integers are compared exactly; anything involving a float is compared
/// as `f64`. Non-numeric values have no ordering.
fn compare(element: &Value, bound: Number) -> Option<Ordering> {
    let integer = match element {
        Value::Int(value) => Some(i128::from(*value)),
        Value::Uint(value) => Some(i128::from(*value)),
        _ => None,
    };
    if let (Some(value), Some(limit)) = (integer, bound.as_integer()) {
        return Some(value.cmp(&limit));
    }
    numeric(element).and_then(|value| value.partial_cmp(&bound.as_f64()))
}

#[expect(clippy::cast_precision_loss, reason = "float bounds are compared as floats")]
const fn numeric(element: &Value) -> Option<f64> {
    match element {
        Value::Int(value) => Some(*value as f64),
        Value::Uint(value) => Some(*value as f64),
        Value::Float(value) => Some(*value),
        _ => None,
    }
}
