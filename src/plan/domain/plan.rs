//! The frozen output of one generation run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chain::{Chain, VersionId};
use crate::conversion::{ConverterSpec, MethodSpec, MutatorSpec, ReceiveTable};
use crate::validation::MessageRules;

/// Everything generated for one chain version.
#[derive(Debug, Clone, Serialize)]
pub struct VersionPlan {
    /// Chain version.
    pub version: VersionId,
    /// Schema package.
    pub package: String,
    /// Service name.
    pub service: String,
    /// Override key of the validator, `<package>.Validator`.
    pub validator_name: String,
    /// Override key of the converter, `<package>.Converter`.
    pub converter_name: String,
    /// Validator functions, one per validated message.
    pub validators: Vec<MessageRules>,
    /// Converter functions by name.
    pub converters: BTreeMap<String, ConverterSpec>,
    /// Service methods.
    pub methods: Vec<MethodSpec>,
    /// Side mutators of private requests.
    pub mutators: Vec<MutatorSpec>,
    /// Receive tables behind the Up enum converters.
    pub receive_tables: Vec<ReceiveTable>,
}

impl VersionPlan {
    /// Override key of a version's validator.
    #[must_use]
    pub fn validator_key(package: &str) -> String {
        format!("{package}.Validator")
    }

    /// Override key of a version's converter.
    #[must_use]
    pub fn converter_key(package: &str) -> String {
        format!("{package}.Converter")
    }

    /// Looks up a converter by function name.
    #[must_use]
    pub fn converter(&self, function: &str) -> Option<&ConverterSpec> {
        self.converters.get(function)
    }

    /// Looks up a validator by function name.
    #[must_use]
    pub fn validator(&self, function: &str) -> Option<&MessageRules> {
        self.validators
            .iter()
            .find(|rules| rules.function == function)
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// The resolved chain and the per-version plans, in delegation order.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPlan {
    /// The resolved chain.
    pub chain: Chain,
    /// One plan per chain version, private last.
    pub versions: Vec<VersionPlan>,
}

impl GenerationPlan {
    /// Looks up a version plan by package.
    #[must_use]
    pub fn version(&self, package: &str) -> Option<&VersionPlan> {
        self.versions
            .iter()
            .find(|version| version.package == package)
    }
}
