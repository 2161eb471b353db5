//! Tests for the end-to-end generation pipeline.

use rstest::rstest;
use serde_json::json;

use crate::chain::tests::fixtures::{PRIVATE, V1, V2, people_packages};
use crate::chain::ChainError;
use crate::descriptor::{DescriptorSet, PackageSchema};
use crate::error::GenerateError;
use crate::plan::{AnnotationCarrier, GeneratorConfig, build_chain, generate, plan_chain};
use crate::validation::RuleError;

/// A two-package set whose public `Thing.legacy` field is deprecated
/// through the option carrier and whose `Thing.id` is required through
/// the comment carrier.
fn thing_set() -> DescriptorSet {
    let thing = |legacy_options: serde_json::Value| {
        json!({
            "name": "Thing",
            "field": [
                { "name": "id", "number": 1, "label": "LABEL_OPTIONAL", "type": "TYPE_STRING" },
                {
                    "name": "legacy", "number": 2, "label": "LABEL_OPTIONAL",
                    "type": "TYPE_STRING", "options": legacy_options
                }
            ]
        })
    };
    let file = |package: &str, legacy_options: serde_json::Value| {
        json!({
            "name": format!("{package}.proto"),
            "package": package,
            "messageType": [thing(legacy_options)],
            "service": [{
                "name": "Things",
                "method": [{
                    "name": "Get",
                    "inputType": format!(".{package}.Thing"),
                    "outputType": format!(".{package}.Thing")
                }]
            }],
            "sourceCodeInfo": {
                "location": [
                    { "path": [4, 0, 2, 0], "leadingComments": " gen:svc validate required=true\n" }
                ]
            }
        })
    };
    serde_json::from_value(json!({
        "file": [
            file("api.v1", json!({ "[gen.svc.field]": { "deprecated": true } })),
            file("internal", json!({}))
        ]
    }))
    .expect("descriptor set should deserialize")
}

fn config(annotations: AnnotationCarrier) -> GeneratorConfig {
    GeneratorConfig {
        private_package: "internal".to_owned(),
        annotations,
        ..GeneratorConfig::default()
    }
}

#[rstest]
fn plans_cover_every_version_private_last(people_packages: Vec<PackageSchema>) {
    let chain = build_chain(&people_packages, &GeneratorConfig::default())
        .expect("chain should build");

    let plan = plan_chain(chain).expect("chain should plan");

    let packages: Vec<&str> = plan
        .versions
        .iter()
        .map(|version| version.package.as_str())
        .collect();
    assert_eq!(packages, [V1, V2, PRIVATE]);
    let v1 = plan.version(V1).expect("v1 planned");
    assert_eq!(v1.service, "People");
    assert_eq!(v1.validator_name, "people.v1.Validator");
    assert_eq!(v1.converter_name, "people.v1.Converter");
    assert!(v1.converter("ToNextCreateRequest").is_some());
    assert!(v1.validator("ValidateCreateRequest").is_some());
    assert!(v1.method("Summarize").is_some_and(|method| method.deprecated));
    let private = plan.version(PRIVATE).expect("private planned");
    assert!(private.converters.is_empty());
}

#[rstest]
#[case::comments(AnnotationCarrier::Comments, false, true)]
#[case::options(AnnotationCarrier::Options, true, false)]
fn the_configured_carrier_is_read(
    #[case] annotations: AnnotationCarrier,
    #[case] legacy_deprecated: bool,
    #[case] id_required: bool,
) {
    let plan = generate(&thing_set(), &config(annotations)).expect("set should generate");

    let chain = &plan.chain;
    let version = chain.version_by_package("api.v1").expect("api planned");
    let thing = chain
        .find_message(version.id, "Thing")
        .expect("Thing exists");
    let legacy = chain.find_field(thing, "legacy").expect("legacy exists");
    let id = chain.find_field(thing, "id").expect("id exists");
    assert_eq!(chain.field(legacy).deprecated, legacy_deprecated);
    assert_eq!(chain.field(id).validate.required, id_required);
}

#[rstest]
fn a_missing_private_package_fails_the_run() {
    let result = generate(&thing_set(), &GeneratorConfig::default());

    assert!(matches!(
        result,
        Err(GenerateError::Chain(ChainError::PrivatePackageNotFound(name))) if name == "private"
    ));
}

#[rstest]
fn malformed_directives_fail_the_run() {
    let mut set = thing_set();
    let location = set
        .file
        .first_mut()
        .and_then(|file| file.source_code_info.as_mut())
        .and_then(|info| info.location.first_mut())
        .expect("location exists");
    location.leading_comments = Some(" gen:svc validate is=isbn\n".to_owned());

    let result = generate(&set, &config(AnnotationCarrier::Comments));

    assert!(matches!(
        result,
        Err(GenerateError::Rule(RuleError::UnknownFormat { field, .. })) if field == "api.v1.Thing.id"
    ));
}
