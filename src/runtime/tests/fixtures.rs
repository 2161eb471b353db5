//! Shared runtime fixtures built on the `people` chain.

use std::collections::HashMap;

use rstest::fixture;

use crate::chain::Chain;
use crate::chain::tests::fixtures::people_chain;
use crate::plan::{GenerationPlan, plan_chain};
use crate::runtime::{Backend, Record, Status, Value};

pub const PERSON_ID: &str = "0f8fad5b-d9cb-469f-a165-70867728950e";

/// Generation plan for the `people` chain.
#[fixture]
pub fn people_plan(people_chain: Chain) -> GenerationPlan {
    plan_chain(people_chain).expect("people chain should plan")
}

/// A private person record.
pub fn private_person(id: &str) -> Record {
    Record::new("private.Person").with("id", id)
}

pub fn employment(name: &str) -> Value {
    Value::Enum(name.to_owned())
}

/// Private backend keeping people in memory.
#[derive(Debug, Default)]
pub struct PeopleStore {
    pub people: HashMap<String, Record>,
    pub calls: Vec<String>,
}

impl PeopleStore {
    pub fn with_person(mut self, person: Record) -> Self {
        let id = person
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        self.people.insert(id, person);
        self
    }

    fn create(&mut self, request: &Record) -> Result<Record, Status> {
        let mut person = Record::new("private.Person");
        person.fields.clone_from(&request.fields);
        let id = request
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Status::invalid_argument("id is required"))?;
        self.people.insert(id.to_owned(), person.clone());
        Ok(Record::new("private.CreateResponse").with("person", person))
    }

    fn lookup(&self, request: &Record) -> Result<Record, Status> {
        let id = request.get("id").and_then(Value::as_str).unwrap_or_default();
        let person = self
            .people
            .get(id)
            .cloned()
            .ok_or_else(|| Status::not_found(format!("person {id} not found")))?;
        Ok(Record::new("private.GetResponse").with("person", person))
    }
}

impl Backend for PeopleStore {
    fn call(&mut self, method: &str, request: &Record) -> Result<Record, Status> {
        self.calls.push(method.to_owned());
        match method {
            "Create" => self.create(request),
            "Get" => self.lookup(request),
            other => Err(Status::not_found(format!("unknown method {other}"))),
        }
    }
}
