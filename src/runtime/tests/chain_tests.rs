//! Tests for the override registry and the assembled service chain.

use rstest::rstest;

use super::fixtures::{PERSON_ID, PeopleStore, employment, people_plan, private_person};
use crate::chain::tests::fixtures::{PRIVATE, V1, V2};
use crate::plan::GenerationPlan;
use crate::runtime::ports::MockBackend;
use crate::runtime::{
    Code, Converter, ConverterStrategy, INCOMPATIBLE_RESOURCE, Record, Registry, RegistryError,
    Status, Validator, ValidatorStrategy, Value,
};

/// Fills in v2-only fields while converting v1 requests.
struct CompleteProfile;

impl ConverterStrategy for CompleteProfile {
    fn down(&self, base: &Converter<'_>, function: &str, input: &Record) -> Result<Record, Status> {
        let mut output = base.down(function, input)?;
        if function == "ToNextCreateRequest" {
            let part = |field: &str| input.get(field).and_then(Value::as_str).unwrap_or_default();
            output.set(
                "full_name",
                format!("{} {}", part("first_name"), part("last_name")),
            );
            output.set("age", 16_i64);
        }
        Ok(output)
    }
}

struct Closed;

impl ValidatorStrategy for Closed {
    fn validate(&self, _: &Validator<'_>, _: &str, _: &Record) -> Result<(), Status> {
        Err(Status::invalid_argument("registrations are closed"))
    }
}

fn v1_create() -> Record {
    Record::new("people.v1.CreateRequest")
        .with("id", PERSON_ID)
        .with("first_name", "Dane")
        .with("last_name", "Harrigan")
        .with("employment", employment("EMPLOYED"))
}

fn get(package: &str) -> Record {
    Record::new(format!("{package}.GetRequest")).with("id", PERSON_ID)
}

fn person(response: &Record) -> &Record {
    response
        .get("person")
        .and_then(Value::as_record)
        .expect("response carries a person")
}

// ============================================================================
// Registry
// ============================================================================

#[rstest]
fn overrides_must_name_a_generated_component(people_plan: GenerationPlan) {
    let mut registry = Registry::new(&people_plan);

    let validator = registry.override_validator("people.v3.Validator", Closed);
    let converter = registry.override_converter("people.v1.Validator", CompleteProfile);

    assert!(matches!(
        validator,
        Err(RegistryError::UnknownOverride(key)) if key == "people.v3.Validator"
    ));
    assert!(matches!(converter, Err(RegistryError::UnknownOverride(_))));
    assert!(registry.override_converter("people.v1.Converter", CompleteProfile).is_ok());
}

#[rstest]
fn a_plan_without_a_private_version_cannot_be_built() {
    let plan = GenerationPlan {
        chain: crate::chain::Chain::default(),
        versions: Vec::new(),
    };

    let result = Registry::new(&plan).build(PeopleStore::default());

    assert!(matches!(result, Err(RegistryError::MissingPrivate)));
}

#[rstest]
fn packages_are_served_in_delegation_order(people_plan: GenerationPlan) {
    let services = Registry::new(&people_plan)
        .build(PeopleStore::default())
        .expect("chain builds");

    let packages: Vec<&str> = services.packages().collect();

    assert_eq!(packages, [V1, V2, PRIVATE]);
}

// ============================================================================
// Calls through the chain
// ============================================================================

#[rstest]
fn latest_version_round_trips_through_the_backend(people_plan: GenerationPlan) {
    let mut services = Registry::new(&people_plan)
        .build(PeopleStore::default())
        .expect("chain builds");
    let request = Record::new("people.v2.CreateRequest")
        .with("id", PERSON_ID)
        .with("full_name", "Dane Harrigan")
        .with("age", 41_i64)
        .with("employment", employment("PART_TIME"));

    let created = services.call(V2, "Create", &request).expect("create succeeds");
    let fetched = services.call(V2, "Get", &get(V2)).expect("get succeeds");

    assert_eq!(created.message, "people.v2.CreateResponse");
    assert_eq!(person(&created), person(&fetched));
    assert_eq!(person(&fetched).get("age"), Some(&Value::Int(41)));
    assert_eq!(services.backend().calls, ["Create", "Get"]);
}

#[rstest]
fn deprecated_request_fields_reach_the_private_request(people_plan: GenerationPlan) {
    let mut backend = MockBackend::new();
    backend
        .expect_call()
        .withf(|method, request| {
            method == "Create"
                && request.message == "private.CreateRequest"
                && request.get("first_name") == Some(&Value::from("Dane"))
                && request.get("last_name") == Some(&Value::from("Harrigan"))
                && request.get("employment") == Some(&employment("FULL_TIME"))
        })
        .times(1)
        .returning(|_, request| {
            let mut person = Record::new("private.Person");
            person.fields.clone_from(&request.fields);
            Ok(Record::new("private.CreateResponse").with("person", person))
        });
    let mut services = Registry::new(&people_plan)
        .build(backend)
        .expect("chain builds");

    let created = services.call(V1, "Create", &v1_create()).expect("create succeeds");

    assert_eq!(created.message, "people.v1.CreateResponse");
    assert_eq!(
        person(&created),
        &Record::new("people.v1.Person")
            .with("id", PERSON_ID)
            .with("first_name", "Dane")
            .with("last_name", "Harrigan")
            .with("employment", employment("EMPLOYED"))
    );
}

#[rstest]
fn converter_overrides_fill_newer_fields(people_plan: GenerationPlan) {
    let mut registry = Registry::new(&people_plan);
    registry
        .override_converter("people.v1.Converter", CompleteProfile)
        .expect("v1 converter is overridable");
    let mut services = registry.build(PeopleStore::default()).expect("chain builds");

    services.call(V1, "Create", &v1_create()).expect("create succeeds");
    let fetched = services.call(V2, "Get", &get(V2)).expect("get succeeds");

    let profile = person(&fetched);
    assert_eq!(profile.get("full_name"), Some(&Value::from("Dane Harrigan")));
    assert_eq!(profile.get("age"), Some(&Value::Int(16)));
}

#[rstest]
fn newer_records_without_received_fields_are_incompatible(people_plan: GenerationPlan) {
    let mut services = Registry::new(&people_plan)
        .build(PeopleStore::default())
        .expect("chain builds");
    let request = Record::new("people.v2.CreateRequest")
        .with("id", PERSON_ID)
        .with("full_name", "Dane Harrigan");
    services.call(V2, "Create", &request).expect("create succeeds");

    let status = services
        .call(V1, "Get", &get(V1))
        .expect_err("v1 cannot show a person without split names");

    assert_eq!(
        status,
        Status::new(Code::FailedPrecondition, INCOMPATIBLE_RESOURCE)
    );
}

#[rstest]
fn received_enum_values_fold_into_their_public_value(people_plan: GenerationPlan) {
    let store = PeopleStore::default().with_person(
        private_person(PERSON_ID)
            .with("first_name", "Dane")
            .with("last_name", "Harrigan")
            .with("employment", employment("PART_TIME")),
    );
    let mut services = Registry::new(&people_plan).build(store).expect("chain builds");

    let fetched = services.call(V1, "Get", &get(V1)).expect("get succeeds");

    assert_eq!(person(&fetched).get("employment"), Some(&employment("EMPLOYED")));
}

#[rstest]
fn deprecated_methods_call_the_private_version_directly(people_plan: GenerationPlan) {
    let store = PeopleStore::default().with_person(
        private_person(PERSON_ID)
            .with("first_name", "Dane")
            .with("last_name", "Harrigan"),
    );
    let mut services = Registry::new(&people_plan).build(store).expect("chain builds");

    let summary = services
        .call(V1, "Summarize", &get(V1))
        .expect("summarize succeeds");

    assert_eq!(summary.message, "people.v1.PersonSummary");
    assert_eq!(person(&summary).get("first_name"), Some(&Value::from("Dane")));
    assert_eq!(services.backend().calls, ["Get"]);
}

#[rstest]
fn rejected_requests_never_reach_the_backend(people_plan: GenerationPlan) {
    let mut backend = MockBackend::new();
    backend.expect_call().never();
    let mut services = Registry::new(&people_plan)
        .build(backend)
        .expect("chain builds");
    let request = Record::new("people.v1.CreateRequest").with("id", "not-a-uuid");

    let status = services
        .call(V1, "Create", &request)
        .expect_err("id is malformed");

    assert_eq!(status, Status::invalid_argument("id must be a valid uuid"));
}

#[rstest]
fn validator_overrides_apply_to_their_version_only(people_plan: GenerationPlan) {
    let mut registry = Registry::new(&people_plan);
    registry
        .override_validator("people.v1.Validator", Closed)
        .expect("v1 validator is overridable");
    let mut services = registry.build(PeopleStore::default()).expect("chain builds");
    let request = Record::new("people.v2.CreateRequest").with("id", PERSON_ID);

    let v1 = services.call(V1, "Create", &v1_create());
    let v2 = services.call(V2, "Create", &request);

    assert_eq!(v1, Err(Status::invalid_argument("registrations are closed")));
    assert!(v2.is_ok());
}

#[rstest]
#[case::package("people.v9", "Get", "unknown package people.v9")]
#[case::method(V2, "Delete", "People has no method Delete")]
fn unknown_targets_are_not_found(
    people_plan: GenerationPlan,
    #[case] package: &str,
    #[case] method: &str,
    #[case] message: &str,
) {
    let mut services = Registry::new(&people_plan)
        .build(PeopleStore::default())
        .expect("chain builds");

    let status = services
        .call(package, method, &Record::default())
        .expect_err("target does not exist");

    assert_eq!(status, Status::not_found(message));
}

#[rstest]
fn backend_statuses_pass_through(people_plan: GenerationPlan) {
    let mut services = Registry::new(&people_plan)
        .build(PeopleStore::default())
        .expect("chain builds");

    let status = services
        .call(V1, "Get", &get(V1))
        .expect_err("nobody was created");

    assert_eq!(status.code, Code::NotFound);
    assert_eq!(status.message, format!("person {PERSON_ID} not found"));
}
