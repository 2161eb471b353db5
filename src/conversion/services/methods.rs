//! Method and mutator specification for one version.

use std::collections::BTreeMap;

use crate::chain::{Chain, MessageId, Method, MethodId, VersionId};
use crate::conversion::{
    domain::{
        ConverterKind, ConverterSpec, DeprecatedInput, MethodSpec, MutatorSpec, ReceiveTable,
        Route, Setter, setter_name,
    },
    error::{ConversionError, ConversionResult},
    services::converters::ConverterPlanner,
};

/// Everything the converter side of one version generates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConversions {
    /// Converter specs by function name.
    pub converters: BTreeMap<String, ConverterSpec>,
    /// Receive tables behind the Up enum converters.
    pub receive_tables: Vec<ReceiveTable>,
    /// One spec per service method.
    pub methods: Vec<MethodSpec>,
    /// One mutator per private request message with deprecated inputs.
    pub mutators: Vec<MutatorSpec>,
}

/// Specifies the converters, methods and mutators of one version.
///
/// The private version only routes to the backend and has no converters.
///
/// # Errors
///
/// Returns the first [`ConversionError`] met.
pub fn specify_version(chain: &Chain, version: VersionId) -> ConversionResult<VersionConversions> {
    let node = chain.version(version);
    if node.is_private {
        let methods = node
            .methods
            .iter()
            .map(|id| backend_method(chain, chain.method(*id)))
            .collect();
        return Ok(VersionConversions {
            methods,
            ..VersionConversions::default()
        });
    }

    let mut planner = ConverterPlanner::new(chain, version);
    let mut methods = Vec::new();
    for id in &node.methods {
        methods.push(public_method(chain, &mut planner, *id)?);
    }
    let mutators = mutators(chain, &methods);
    let (converters, receive_tables) = planner.finish();
    tracing::debug!(
        package = %node.package,
        converters = converters.len(),
        methods = methods.len(),
        mutators = mutators.len(),
        "version conversions specified"
    );
    Ok(VersionConversions {
        converters,
        receive_tables,
        methods,
        mutators,
    })
}

fn validator_function(chain: &Chain, message: MessageId) -> String {
    format!(
        "Validate{}",
        Chain::type_ident(&chain.message(message).local_name)
    )
}

fn backend_method(chain: &Chain, method: &Method) -> MethodSpec {
    MethodSpec {
        method: method.id,
        name: method.name.clone(),
        deprecated: method.deprecated,
        route: Route::Backend,
        input: method.input,
        output: method.output,
        validate: validator_function(chain, method.input),
        down: None,
        up: None,
        target: method.name.clone(),
        deprecated_inputs: Vec::new(),
    }
}

fn method_path(chain: &Chain, method: &Method) -> String {
    format!("{}.{}", chain.version(method.version).package, method.name)
}

fn public_method(
    chain: &Chain,
    planner: &mut ConverterPlanner<'_>,
    id: MethodId,
) -> ConversionResult<MethodSpec> {
    let method = chain.method(id);
    let latest = chain.version(method.version).is_latest;
    let (route, down_kind, up_kind, target) = if method.deprecated || latest {
        let up = if method.deprecated {
            ConverterKind::ToDeprecatedPublic
        } else {
            ConverterKind::ToPublic
        };
        (Route::Private, ConverterKind::ToPrivate, up, method.private)
    } else {
        (
            Route::Next,
            ConverterKind::ToNext,
            ConverterKind::ToPublic,
            method.next,
        )
    };
    let target = chain.method(target.ok_or_else(|| ConversionError::Unresolved {
        entity: method_path(chain, method),
        function: down_kind.function_name(&chain.message(method.input).local_name),
    })?);

    let input = chain.message(method.input);
    let input_counterpart = if route == Route::Next {
        input.next
    } else {
        input.private
    };
    check_correspondence(chain, method, "input", input_counterpart, target.input)?;

    let output = chain.message(method.output);
    let output_counterpart = if route == Route::Next && !output.deprecated {
        output.next
    } else {
        output.private
    };
    let expected_output = if route == Route::Next && output.deprecated {
        target.private.map_or(target.output, |private| chain.method(private).output)
    } else {
        target.output
    };
    check_correspondence(chain, method, "output", output_counterpart, expected_output)?;

    let down = planner.request_message(down_kind, method.input)?;
    let up = planner.request_message(up_kind, method.output)?;

    let mut deprecated_inputs = Vec::new();
    if route == Route::Next {
        for field in chain.plain_fields(method.input).filter(|field| field.deprecated) {
            let Some(private_field) = field.private else {
                continue;
            };
            let Some(action) =
                planner.down_action(ConverterKind::ToPrivate, field.id, private_field)?
            else {
                continue;
            };
            let private_name = chain.field(private_field).name.clone();
            deprecated_inputs.push(DeprecatedInput {
                field: field.name.clone(),
                setter: setter_name(&private_name),
                private_field: private_name,
                repeated: field.repeated,
                action,
            });
        }
    }

    Ok(MethodSpec {
        method: id,
        name: method.name.clone(),
        deprecated: method.deprecated,
        route,
        input: method.input,
        output: method.output,
        validate: validator_function(chain, method.input),
        down: Some(down.function),
        up: Some(up.function),
        target: target.name.clone(),
        deprecated_inputs,
    })
}

fn check_correspondence(
    chain: &Chain,
    method: &Method,
    role: &'static str,
    found: Option<MessageId>,
    expected: MessageId,
) -> ConversionResult<()> {
    if found == Some(expected) {
        return Ok(());
    }
    let own = if role == "input" {
        method.input
    } else {
        method.output
    };
    Err(ConversionError::MethodMismatch {
        method: method_path(chain, method),
        role,
        found: chain
            .message(found.unwrap_or(own))
            .full_name
            .clone(),
        expected: chain.message(expected).full_name.clone(),
    })
}

/// Groups the deprecated inputs of methods routed through the next version
/// by the private request message they are written into.
fn mutators(chain: &Chain, methods: &[MethodSpec]) -> Vec<MutatorSpec> {
    let mut grouped: BTreeMap<MessageId, MutatorSpec> = BTreeMap::new();
    for spec in methods.iter().filter(|spec| !spec.deprecated_inputs.is_empty()) {
        let Some(private) = chain.message(spec.input).private else {
            continue;
        };
        let mutator = grouped.entry(private).or_insert_with(|| MutatorSpec {
            message: private,
            message_name: chain.message(private).full_name.clone(),
            setters: Vec::new(),
        });
        for input in &spec.deprecated_inputs {
            if mutator.setters.iter().all(|setter| setter.field != input.private_field) {
                mutator.setters.push(Setter {
                    field: input.private_field.clone(),
                    function: input.setter.clone(),
                });
            }
        }
    }
    grouped.into_values().collect()
}
