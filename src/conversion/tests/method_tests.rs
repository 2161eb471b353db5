//! Tests for method routing and mutator grouping.

use rstest::rstest;

use crate::chain::Chain;
use crate::chain::tests::fixtures::{
    PRIVATE, V1, V2, build, message, method, package, people_chain, string,
};
use crate::conversion::{
    Action, ConversionError, DeprecatedInput, MethodSpec, MutatorSpec, Route, Setter,
    specify_version,
};

fn methods(chain: &Chain, package: &str) -> Vec<MethodSpec> {
    let version = chain
        .version_by_package(package)
        .expect("package should be in the chain")
        .id;
    specify_version(chain, version)
        .expect("version specifies")
        .methods
}

fn find<'a>(specs: &'a [MethodSpec], name: &str) -> &'a MethodSpec {
    specs
        .iter()
        .find(|spec| spec.name == name)
        .expect("method should be specified")
}

#[rstest]
#[case::older_version(V1, "Create", Route::Next, "ToNextCreateRequest", "ToPublicCreateResponse", "Create")]
#[case::older_read(V1, "Get", Route::Next, "ToNextGetRequest", "ToPublicGetResponse", "Get")]
#[case::deprecated(
    V1,
    "Summarize",
    Route::Private,
    "ToPrivateGetRequest",
    "ToDeprecatedPublicPersonSummary",
    "Get"
)]
#[case::latest(V2, "Create", Route::Private, "ToPrivateCreateRequest", "ToPublicCreateResponse", "Create")]
fn methods_route_by_version_and_deprecation(
    people_chain: Chain,
    #[case] package: &str,
    #[case] name: &str,
    #[case] route: Route,
    #[case] down: &str,
    #[case] up: &str,
    #[case] target: &str,
) {
    let specs = methods(&people_chain, package);

    let spec = find(&specs, name);

    assert_eq!(spec.route, route);
    assert_eq!(spec.down.as_deref(), Some(down));
    assert_eq!(spec.up.as_deref(), Some(up));
    assert_eq!(spec.target, target);
}

#[rstest]
fn private_methods_call_the_backend(people_chain: Chain) {
    let specs = methods(&people_chain, PRIVATE);

    assert!(specs.iter().all(|spec| spec.route == Route::Backend));
    let create = find(&specs, "Create");
    assert_eq!(create.validate, "ValidateCreateRequest");
    assert_eq!(create.down, None);
    assert_eq!(create.up, None);
}

#[rstest]
fn deprecated_request_fields_are_forwarded_to_private(people_chain: Chain) {
    let specs = methods(&people_chain, V1);

    let create = find(&specs, "Create");

    assert_eq!(
        create.deprecated_inputs,
        [
            DeprecatedInput {
                field: "first_name".to_owned(),
                private_field: "first_name".to_owned(),
                setter: "SetFirstName".to_owned(),
                repeated: false,
                action: Action::Copy,
            },
            DeprecatedInput {
                field: "last_name".to_owned(),
                private_field: "last_name".to_owned(),
                setter: "SetLastName".to_owned(),
                repeated: false,
                action: Action::Copy,
            },
        ]
    );
    assert!(find(&specs, "Summarize").deprecated_inputs.is_empty());
}

#[rstest]
fn mutators_group_setters_by_private_request(people_chain: Chain) {
    let version = people_chain.version_by_package(V1).expect("v1 exists").id;

    let conversions = specify_version(&people_chain, version).expect("v1 specifies");

    let [
        MutatorSpec {
            message_name,
            setters,
            ..
        },
    ] = conversions.mutators.as_slice()
    else {
        panic!("expected one mutator");
    };
    assert_eq!(message_name, "private.CreateRequest");
    assert_eq!(
        setters,
        &[
            Setter {
                field: "first_name".to_owned(),
                function: "SetFirstName".to_owned(),
            },
            Setter {
                field: "last_name".to_owned(),
                function: "SetLastName".to_owned(),
            },
        ]
    );
}

#[rstest]
fn the_latest_version_has_no_mutators(people_chain: Chain) {
    let version = people_chain.version_by_package(V2).expect("v2 exists").id;

    let conversions = specify_version(&people_chain, version).expect("v2 specifies");

    assert!(conversions.mutators.is_empty());
}

#[rstest]
fn requests_must_correspond_to_the_target_method() {
    let public = package(
        "api.v1",
        vec![method("api.v1", "Get", "Thing", "Reply")],
        vec![
            message("api.v1", "Thing", vec![string("id", 1)]),
            message("api.v1", "Reply", Vec::new()),
        ],
        Vec::new(),
    );
    let private = package(
        PRIVATE,
        vec![method(PRIVATE, "Get", "Lookup", "Reply")],
        vec![
            message(PRIVATE, "Thing", vec![string("id", 1)]),
            message(PRIVATE, "Lookup", vec![string("id", 1)]),
            message(PRIVATE, "Reply", Vec::new()),
        ],
        Vec::new(),
    );
    let chain = build(&[public, private]).expect("chain should build");
    let version = chain.version_by_package("api.v1").expect("api exists").id;

    let result = specify_version(&chain, version);

    assert_eq!(
        result.map(|conversions| conversions.methods.len()),
        Err(ConversionError::MethodMismatch {
            method: "api.v1.Get".to_owned(),
            role: "input",
            found: "private.Thing".to_owned(),
            expected: "private.Lookup".to_owned(),
        })
    );
}
