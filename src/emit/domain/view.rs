//! Template views of a generation plan.
//!
//! Views resolve arena ids to names and pre-render statement lines so the
//! templates only lay them out.

use serde::Serialize;

use crate::chain::Chain;
use crate::conversion::{
    Action, Assignment, CheckTarget, ConverterSpec, EnumConverter, MessageConverter, MethodSpec,
    OneofMapping, Route, Shape, Side,
};
use crate::plan::{GenerationPlan, VersionPlan};
use crate::validation::{MemberSet, MessageRules, Rule};

/// One validator function.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatorView {
    /// Function name.
    pub function: String,
    /// Validated message.
    pub message: String,
    /// Check statements in evaluation order.
    pub checks: Vec<String>,
}

/// One converter function.
#[derive(Debug, Clone, Serialize)]
pub struct ConverterView {
    /// Function name.
    pub function: String,
    /// Function signature.
    pub signature: String,
    /// Body statements.
    pub body: Vec<String>,
}

/// One service method.
#[derive(Debug, Clone, Serialize)]
pub struct MethodView {
    /// Method name.
    pub name: String,
    /// Deprecated marker.
    pub deprecated: bool,
    /// Request message.
    pub input: String,
    /// Response message.
    pub output: String,
    /// Handler statements.
    pub steps: Vec<String>,
}

/// One mutator helper.
#[derive(Debug, Clone, Serialize)]
pub struct MutatorView {
    /// Private request message.
    pub message: String,
    /// Setter function names with the field they write.
    pub setters: Vec<(String, String)>,
}

/// Everything a version unit renders.
#[derive(Debug, Clone, Serialize)]
pub struct VersionView {
    /// Schema package.
    pub package: String,
    /// Service name.
    pub service: String,
    /// Private version marker.
    pub is_private: bool,
    /// Validator override key.
    pub validator: String,
    /// Converter override key.
    pub converter: String,
    /// Validator functions.
    pub validators: Vec<ValidatorView>,
    /// Converter functions.
    pub converters: Vec<ConverterView>,
    /// Service methods.
    pub methods: Vec<MethodView>,
    /// Mutator helpers.
    pub mutators: Vec<MutatorView>,
}

/// One chain link of the register unit.
#[derive(Debug, Clone, Serialize)]
pub struct LinkView {
    /// Schema package.
    pub package: String,
    /// Service name.
    pub service: String,
    /// Validator override key.
    pub validator: String,
    /// Converter override key, absent on the private version.
    pub converter: Option<String>,
    /// Package delegated to, absent on the private version.
    pub next: Option<String>,
}

/// Everything the register unit renders.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterView {
    /// Links in delegation order, private last.
    pub links: Vec<LinkView>,
}

impl RegisterView {
    /// Builds the register view of a plan.
    #[must_use]
    pub fn from_plan(plan: &GenerationPlan) -> Self {
        let links = plan
            .versions
            .iter()
            .map(|version| {
                let node = plan.chain.version(version.version);
                let next = node
                    .next
                    .map(|next| plan.chain.version(next).package.clone());
                LinkView {
                    package: version.package.clone(),
                    service: version.service.clone(),
                    validator: version.validator_name.clone(),
                    converter: (!node.is_private).then(|| version.converter_name.clone()),
                    next,
                }
            })
            .collect();
        Self { links }
    }
}

impl VersionView {
    /// Builds the view of one version plan.
    #[must_use]
    pub fn from_plan(chain: &Chain, version: &VersionPlan) -> Self {
        Self {
            package: version.package.clone(),
            service: version.service.clone(),
            is_private: chain.version(version.version).is_private,
            validator: version.validator_name.clone(),
            converter: version.converter_name.clone(),
            validators: version
                .validators
                .iter()
                .map(|rules| validator_view(chain, rules))
                .collect(),
            converters: version.converters.values().map(converter_view).collect(),
            methods: version
                .methods
                .iter()
                .map(|method| method_view(chain, method))
                .collect(),
            mutators: version
                .mutators
                .iter()
                .map(|mutator| MutatorView {
                    message: mutator.message_name.clone(),
                    setters: mutator
                        .setters
                        .iter()
                        .map(|setter| (setter.function.clone(), setter.field.clone()))
                        .collect(),
                })
                .collect(),
        }
    }
}

fn list<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn rule_check(chain: &Chain, field: &str, rule: &Rule) -> String {
    match rule {
        Rule::Required => format!("require(&input.{field})?;"),
        Rule::Nested { message } => format!(
            "Validate{}(&input.{field})?;",
            Chain::type_ident(&chain.message(*message).local_name)
        ),
        Rule::Format { format } => format!("is_{format}(&input.{field})?;"),
        Rule::In { members } => {
            let rendered = match members {
                MemberSet::Bools(values) => list(values),
                MemberSet::Ints(values) => list(values),
                MemberSet::Uints(values) => list(values),
                MemberSet::Floats(values) => list(values),
                MemberSet::Bytes(values) => values
                    .iter()
                    .map(|value| format!("{value:?}.as_bytes()"))
                    .collect::<Vec<_>>()
                    .join(", "),
                MemberSet::Strings(values) | MemberSet::EnumValues(values) => values
                    .iter()
                    .map(|value| format!("{value:?}"))
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            format!("one_of(&input.{field}, &[{rendered}])?;")
        }
        Rule::Range { min, max } => format!(
            "in_range(&input.{field}, {}, {})?;",
            min.map_or_else(|| "None".to_owned(), |min| format!("Some({min})")),
            max.map_or_else(|| "None".to_owned(), |max| format!("Some({max})")),
        ),
        Rule::Length { min, max } => format!("length(&input.{field}, {min}, {max})?;"),
    }
}

fn validator_view(chain: &Chain, rules: &MessageRules) -> ValidatorView {
    let mut checks: Vec<String> = rules
        .fields
        .iter()
        .flat_map(|field| {
            field
                .rules
                .iter()
                .map(|rule| rule_check(chain, &field.name, rule))
        })
        .collect();
    checks.extend(
        rules
            .oneofs
            .iter()
            .map(|oneof| format!("require_variant(&input.{})?;", oneof.name)),
    );
    ValidatorView {
        function: rules.function.clone(),
        message: chain.message(rules.message).full_name.clone(),
        checks,
    }
}

const fn side(read: Side) -> &'static str {
    match read {
        Side::Public => "input",
        Side::Next => "next",
        Side::Private => "private",
    }
}

fn call(action: &Action, argument: &str, private: Option<&str>) -> String {
    match action {
        Action::Copy => format!("{argument}.clone()"),
        Action::Convert(converter) => match private {
            Some(private) => format!("{}(&{argument}, {private})?", converter.function),
            None => format!("{}(&{argument})?", converter.function),
        },
    }
}

fn assignment_line(assignment: &Assignment) -> String {
    let source = format!("{}.{}", side(assignment.read), assignment.from);
    let private = assignment
        .private_from
        .as_ref()
        .map(|name| format!("&private.{name}"));
    if assignment.repeated {
        let element = call(&assignment.action, "item", private.as_deref());
        format!(
            "out.{} = {source}.iter().map(|item| Ok({element})).collect::<Result<_, Status>>()?;",
            assignment.to
        )
    } else {
        format!(
            "out.{} = {};",
            assignment.to,
            call(&assignment.action, &source, private.as_deref())
        )
    }
}

fn oneof_lines(mapping: &OneofMapping) -> Vec<String> {
    let mut lines = vec![format!(
        "match &{}.{} {{",
        side(mapping.read),
        mapping.from
    )];
    for arm in &mapping.arms {
        let private = arm
            .private_from
            .as_ref()
            .map(|name| format!("private.{name}()"));
        lines.push(format!(
            "    Some({from}(value)) => out.{to} = Some({variant}({})),",
            call(&arm.action, "value", private.as_deref()),
            from = arm.from,
            to = mapping.to,
            variant = arm.to,
        ));
    }
    lines.push("    _ => {}".to_owned());
    lines.push("}".to_owned());
    lines
}

fn message_view(spec: &MessageConverter) -> ConverterView {
    let signature = match spec.shape {
        Shape::Down => format!(
            "fn {}(&self, input: &{}) -> Result<{}, Status>",
            spec.function, spec.public_name, spec.counterpart_name
        ),
        Shape::UpFromPrivate => format!(
            "fn {}(&self, private: &{}) -> Result<{}, Status>",
            spec.function, spec.counterpart_name, spec.public_name
        ),
        Shape::UpFromNext => format!(
            "fn {}(&self, next: &{}, private: &Private) -> Result<{}, Status>",
            spec.function, spec.counterpart_name, spec.public_name
        ),
    };
    let mut body: Vec<String> = spec
        .required
        .iter()
        .map(|check| match check.target {
            CheckTarget::Field => format!(
                "require_received(&{}.{}, \"{}\")?;",
                side(check.read),
                check.name,
                check.public_name
            ),
            CheckTarget::Oneof => format!(
                "require_received_variant(&{}.{}, \"{}\")?;",
                side(check.read),
                check.name,
                check.public_name
            ),
        })
        .collect();
    body.push(format!("let mut out = {}::default();", spec.output_name()));
    body.extend(spec.assignments.iter().map(assignment_line));
    body.extend(spec.oneofs.iter().flat_map(oneof_lines));
    body.extend(
        spec.unconverted
            .iter()
            .map(|field| format!("// {field}: no automatic conversion")),
    );
    body.push("Ok(out)".to_owned());
    ConverterView {
        function: spec.function.clone(),
        signature,
        body,
    }
}

fn enum_view(spec: &EnumConverter) -> ConverterView {
    let mut body = vec!["match value {".to_owned()];
    body.extend(
        spec.cases
            .iter()
            .map(|case| format!("    {:?} => Ok({:?}),", case.from, case.to)),
    );
    body.push(match &spec.fallback {
        Some(fallback) => format!("    _ => Ok({fallback:?}),"),
        None => "    _ => Err(Status::failed_precondition(\"unexpected value\")),".to_owned(),
    });
    body.push("}".to_owned());
    ConverterView {
        function: spec.function.clone(),
        signature: format!(
            "fn {}(&self, value: &str) -> Result<&'static str, Status>",
            spec.function
        ),
        body,
    }
}

fn converter_view(spec: &ConverterSpec) -> ConverterView {
    match spec {
        ConverterSpec::Message(message) => message_view(message),
        ConverterSpec::Enum(enumeration) => enum_view(enumeration),
    }
}

fn method_view(chain: &Chain, method: &MethodSpec) -> MethodView {
    let mut steps = vec![format!("self.validator.{}(&input)?;", method.validate)];
    let request = match &method.down {
        Some(down) => {
            steps.push(format!("let request = self.converter.{down}(&input)?;"));
            "request"
        }
        None => "input",
    };
    for input in &method.deprecated_inputs {
        steps.push(format!(
            "let mutation = {}(input.{}.clone());",
            input.setter, input.field
        ));
        steps.push("mutations.push(mutation);".to_owned());
    }
    steps.push(match method.route {
        Route::Next => format!(
            "let (next, private) = self.next.{}(ctx, {request}, mutations)?;",
            method.target
        ),
        Route::Private => format!(
            "let private = self.private.{}(ctx, {request}, mutations)?;",
            method.target
        ),
        Route::Backend => format!(
            "let private = self.backend.{}(ctx, apply(mutations, {request}))?;",
            method.target
        ),
    });
    steps.push(match (&method.up, method.route) {
        (Some(up), Route::Next) => format!(
            "self.converter.{up}(&next, &private).map_err(incompatible)"
        ),
        (Some(up), _) => format!("self.converter.{up}(&private).map_err(incompatible)"),
        (None, _) => "Ok(private)".to_owned(),
    });
    MethodView {
        name: method.name.clone(),
        deprecated: method.deprecated,
        input: chain.message(method.input).full_name.clone(),
        output: chain.message(method.output).full_name.clone(),
        steps,
    }
}
