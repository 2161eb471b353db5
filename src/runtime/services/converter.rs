//! Executes the converter specs of one version against dynamic records.

use crate::conversion::{
    Action, CheckTarget, ConverterSpec, EnumConverter, MessageConverter, OneofMapping, Shape,
    Side, VariantArm,
};
use crate::plan::VersionPlan;
use crate::runtime::domain::{Record, Status, Value};

/// The generated converter of one version.
///
/// Nested conversions always run the generated functions; overrides only
/// apply to the top-level call made by the service.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'p> {
    plan: &'p VersionPlan,
}

impl<'p> Converter<'p> {
    /// Creates the converter of `plan`.
    #[must_use]
    pub const fn new(plan: &'p VersionPlan) -> Self {
        Self { plan }
    }

    /// The version plan behind this converter.
    #[must_use]
    pub const fn plan(&self) -> &'p VersionPlan {
        self.plan
    }

    /// Runs Down converter `function` on a public record.
    ///
    /// # Errors
    ///
    /// Returns `Internal` when `function` is not a Down message converter
    /// of this version.
    pub fn down(&self, function: &str, input: &Record) -> Result<Record, Status> {
        let spec = self.message_spec(function)?;
        if spec.shape != Shape::Down {
            return Err(Status::internal(format!("{function} is not a down converter")));
        }
        self.run_down(spec, input)
    }

    /// Runs Up converter `function` on the next version's record and the
    /// private record. `next` may be `None` for converters reading only
    /// the private record.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when a receive-required field is empty,
    /// `FailedPrecondition` for enum values with no public counterpart and
    /// `Internal` when `function` is not an Up message converter.
    pub fn up(&self, function: &str, next: Option<&Record>, private: &Record) -> Result<Record, Status> {
        let spec = self.message_spec(function)?;
        if spec.shape == Shape::Down {
            return Err(Status::internal(format!("{function} is not an up converter")));
        }
        self.run_up(spec, next, private)
    }

    /// Applies a field action to a Down value, element-wise for lists.
    ///
    /// # Errors
    ///
    /// Returns the status of the nested conversion.
    pub fn apply(&self, action: &Action, value: &Value) -> Result<Value, Status> {
        self.convert(action, value, None)
    }

    fn message_spec(&self, function: &str) -> Result<&'p MessageConverter, Status> {
        match self.plan.converter(function) {
            Some(ConverterSpec::Message(spec)) => Ok(spec),
            Some(ConverterSpec::Enum(_)) => Err(Status::internal(format!(
                "{function} converts enums, not messages"
            ))),
            None => Err(Status::internal(format!(
                "{} has no converter {function}",
                self.plan.package
            ))),
        }
    }

    fn run_down(&self, spec: &MessageConverter, input: &Record) -> Result<Record, Status> {
        let mut output = Record::new(spec.counterpart_name.clone());
        for assignment in &spec.assignments {
            if let Some(value) = input.get(&assignment.from) {
                output.set(assignment.to.clone(), self.convert(&assignment.action, value, None)?);
            }
        }
        for mapping in &spec.oneofs {
            if let Some((arm, value)) = select_arm(mapping, input) {
                let converted = self.convert(&arm.action, value, None)?;
                output.set(
                    mapping.to.clone(),
                    Value::Oneof {
                        variant: arm.to.clone(),
                        value: Box::new(converted),
                    },
                );
            }
        }
        Ok(output)
    }

    fn run_up(
        &self,
        spec: &MessageConverter,
        next: Option<&Record>,
        private: &Record,
    ) -> Result<Record, Status> {
        for check in &spec.required {
            let record = pick(check.read, next, private, &spec.function)?;
            let present = match check.target {
                CheckTarget::Field => record.is_set(&check.name),
                CheckTarget::Oneof => record.get(&check.name).is_some(),
            };
            if !present {
                return Err(Status::invalid_argument(format!(
                    "{} is required",
                    check.public_name
                )));
            }
        }

        let mut output = Record::new(spec.public_name.clone());
        for assignment in &spec.assignments {
            let source = pick(assignment.read, next, private, &spec.function)?;
            let Some(value) = source.get(&assignment.from) else {
                continue;
            };
            let private_value = if assignment.read == Side::Private {
                Some(value)
            } else {
                assignment
                    .private_from
                    .as_deref()
                    .and_then(|name| private.get(name))
            };
            output.set(
                assignment.to.clone(),
                self.convert(&assignment.action, value, private_value)?,
            );
        }
        for mapping in &spec.oneofs {
            let source = pick(mapping.read, next, private, &spec.function)?;
            let Some((arm, value)) = select_arm(mapping, source) else {
                continue;
            };
            let private_value = if mapping.read == Side::Private {
                Some(value)
            } else {
                private_variant(mapping, arm, private)
            };
            let converted = self.convert(&arm.action, value, private_value)?;
            output.set(
                mapping.to.clone(),
                Value::Oneof {
                    variant: arm.to.clone(),
                    value: Box::new(converted),
                },
            );
        }
        Ok(output)
    }

    fn convert(&self, action: &Action, value: &Value, private: Option<&Value>) -> Result<Value, Status> {
        let Action::Convert(reference) = action else {
            return Ok(value.clone());
        };
        if let Value::List(items) = value {
            let privates = match private {
                Some(Value::List(values)) => values.as_slice(),
                _ => &[],
            };
            return items
                .iter()
                .enumerate()
                .map(|(position, item)| self.convert(action, item, privates.get(position)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List);
        }
        self.convert_one(&reference.function, value, private)
    }

    fn convert_one(&self, function: &str, value: &Value, private: Option<&Value>) -> Result<Value, Status> {
        match self.plan.converter(function) {
            Some(ConverterSpec::Enum(spec)) => match value {
                Value::Enum(name) => convert_enum(spec, name).map(Value::Enum),
                other => Err(mismatch(function, other)),
            },
            Some(ConverterSpec::Message(spec)) => {
                let record = value.as_record().ok_or_else(|| mismatch(function, value))?;
                let converted = match spec.shape {
                    Shape::Down => self.run_down(spec, record)?,
                    Shape::UpFromPrivate => self.run_up(spec, None, record)?,
                    Shape::UpFromNext => {
                        let empty = Record::default();
                        let private_record = private.and_then(Value::as_record).unwrap_or(&empty);
                        self.run_up(spec, Some(record), private_record)?
                    }
                };
                Ok(Value::Message(converted))
            }
            None => Err(Status::internal(format!(
                "{} has no converter {function}",
                self.plan.package
            ))),
        }
    }
}

fn pick<'r>(
    read: Side,
    next: Option<&'r Record>,
    private: &'r Record,
    function: &str,
) -> Result<&'r Record, Status> {
    match read {
        Side::Next => {
            next.ok_or_else(|| Status::internal(format!("{function} needs the next version's record")))
        }
        Side::Private => Ok(private),
        Side::Public => Err(Status::internal(format!(
            "{function} cannot read a public record"
        ))),
    }
}

fn select_arm<'s, 'r>(
    mapping: &'s OneofMapping,
    record: &'r Record,
) -> Option<(&'s VariantArm, &'r Value)> {
    let Some(Value::Oneof { variant, value }) = record.get(&mapping.from) else {
        return None;
    };
    mapping
        .arms
        .iter()
        .find(|arm| arm.from == *variant)
        .map(|arm| (arm, value.as_ref()))
}

fn private_variant<'r>(mapping: &OneofMapping, arm: &VariantArm, private: &'r Record) -> Option<&'r Value> {
    let name = mapping.private_from.as_deref()?;
    match private.get(name) {
        Some(Value::Oneof { variant, value }) if arm.private_from.as_deref() == Some(variant) => {
            Some(value.as_ref())
        }
        _ => None,
    }
}

fn convert_enum(spec: &EnumConverter, name: &str) -> Result<String, Status> {
    spec.cases
        .iter()
        .find(|case| case.from == name)
        .map(|case| case.to.clone())
        .or_else(|| spec.fallback.clone())
        .ok_or_else(|| {
            Status::failed_precondition(format!("unexpected value {name} in {}", spec.function))
        })
}

fn mismatch(function: &str, value: &Value) -> Status {
    Status::internal(format!("{function} cannot convert {value:?}"))
}
