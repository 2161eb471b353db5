//! Override registry and the assembled chain of version services.
//!
//! Each public version validates its request, converts it down, hands it
//! to the next version (or straight to the private version for
//! deprecated and latest-version methods) and converts the response back
//! up. Deprecated request fields skip the intermediate versions: they are
//! converted to private shapes and written onto the private request once
//! the call reaches it.

use std::collections::HashMap;

use regex::Regex;

use super::converter::Converter;
use super::validator::{EMAIL_PATTERN, Validator};
use crate::conversion::Route;
use crate::plan::{GenerationPlan, VersionPlan};
use crate::runtime::domain::{Record, Status, Value};
use crate::runtime::error::{RegistryError, RegistryResult};
use crate::runtime::ports::{Backend, ConverterStrategy, DefaultStrategy, ValidatorStrategy};

/// A deprecated request value bound for a private request field.
type Mutation = (String, Value);

/// Collects validator and converter overrides before the chain is built.
///
/// Keys are `<package>.Validator` and `<package>.Converter`; registering a
/// key again replaces the earlier strategy.
pub struct Registry<'p> {
    plan: &'p GenerationPlan,
    validators: HashMap<String, Box<dyn ValidatorStrategy>>,
    converters: HashMap<String, Box<dyn ConverterStrategy>>,
}

impl<'p> Registry<'p> {
    /// Creates a registry with every component at its generated default.
    #[must_use]
    pub fn new(plan: &'p GenerationPlan) -> Self {
        Self {
            plan,
            validators: HashMap::new(),
            converters: HashMap::new(),
        }
    }

    /// Replaces the validator registered as `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownOverride`] when no version owns `key`.
    pub fn override_validator(
        &mut self,
        key: &str,
        strategy: impl ValidatorStrategy + 'static,
    ) -> RegistryResult<()> {
        if !self.plan.versions.iter().any(|version| version.validator_name == key) {
            return Err(RegistryError::UnknownOverride(key.to_owned()));
        }
        if self.validators.insert(key.to_owned(), Box::new(strategy)).is_some() {
            tracing::debug!(key, "validator override replaced");
        }
        Ok(())
    }

    /// Replaces the converter registered as `key`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownOverride`] when no version owns `key`.
    pub fn override_converter(
        &mut self,
        key: &str,
        strategy: impl ConverterStrategy + 'static,
    ) -> RegistryResult<()> {
        if !self.plan.versions.iter().any(|version| version.converter_name == key) {
            return Err(RegistryError::UnknownOverride(key.to_owned()));
        }
        if self.converters.insert(key.to_owned(), Box::new(strategy)).is_some() {
            tracing::debug!(key, "converter override replaced");
        }
        Ok(())
    }

    /// Wires every version to its successor and the private version to
    /// `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MissingPrivate`] for a plan without a
    /// private version.
    pub fn build<B: Backend>(mut self, backend: B) -> RegistryResult<ServiceChain<'p, B>> {
        let plan = self.plan;
        if plan.chain.private_version().is_none() {
            return Err(RegistryError::MissingPrivate);
        }
        let email = Regex::new(EMAIL_PATTERN)?;
        let versions = plan
            .versions
            .iter()
            .map(|version| VersionService {
                plan: version,
                validator: Validator::new(&plan.chain, version, email.clone()),
                converter: Converter::new(version),
                validator_strategy: self
                    .validators
                    .remove(&version.validator_name)
                    .unwrap_or_else(|| Box::new(DefaultStrategy)),
                converter_strategy: self
                    .converters
                    .remove(&version.converter_name)
                    .unwrap_or_else(|| Box::new(DefaultStrategy)),
            })
            .collect();
        tracing::debug!(versions = plan.versions.len(), "service chain built");
        Ok(ServiceChain { versions, backend })
    }
}

/// One version's service with its effective strategies.
struct VersionService<'p> {
    plan: &'p VersionPlan,
    validator: Validator<'p>,
    converter: Converter<'p>,
    validator_strategy: Box<dyn ValidatorStrategy>,
    converter_strategy: Box<dyn ConverterStrategy>,
}

impl VersionService<'_> {
    fn validate(&self, function: &str, request: &Record) -> Result<(), Status> {
        self.validator_strategy
            .validate(&self.validator, function, request)
    }
}

/// Every version service of a plan, ending in the private implementation.
pub struct ServiceChain<'p, B> {
    versions: Vec<VersionService<'p>>,
    backend: B,
}

impl<B: Backend> ServiceChain<'_, B> {
    /// Calls `method` on the service of `package`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown packages or methods, `InvalidArgument`
    /// for rejected requests and `FailedPrecondition` when a response
    /// cannot be represented in the caller's version. Backend statuses
    /// pass through.
    pub fn call(&mut self, package: &str, method: &str, request: &Record) -> Result<Record, Status> {
        let index = self
            .versions
            .iter()
            .position(|service| service.plan.package == package)
            .ok_or_else(|| Status::not_found(format!("unknown package {package}")))?;
        invoke(&self.versions, &mut self.backend, index, method, request, Vec::new())
            .map(|(output, _)| output)
    }

    /// Packages served, in delegation order.
    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.versions
            .iter()
            .map(|service| service.plan.package.as_str())
    }

    /// The private implementation.
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

/// Returns the response in the version at `index` together with the
/// private response it was built from.
fn invoke<B: Backend>(
    versions: &[VersionService<'_>],
    backend: &mut B,
    index: usize,
    method: &str,
    request: &Record,
    mutations: Vec<Mutation>,
) -> Result<(Record, Record), Status> {
    let service = versions
        .get(index)
        .ok_or_else(|| Status::internal("the service chain ended before the private version"))?;
    let spec = service.plan.method(method).ok_or_else(|| {
        Status::not_found(format!("{} has no method {method}", service.plan.service))
    })?;
    tracing::debug!(
        package = %service.plan.package,
        method,
        route = ?spec.route,
        "dispatching call"
    );

    if spec.route == Route::Backend {
        let mut private_request = request.clone();
        for (field, value) in mutations {
            private_request.set(field, value);
        }
        service.validate(&spec.validate, &private_request)?;
        let response = backend.call(&spec.target, &private_request)?;
        return Ok((response.clone(), response));
    }

    service.validate(&spec.validate, request)?;
    let down = spec
        .down
        .as_deref()
        .ok_or_else(|| Status::internal(format!("{method} has no request converter")))?;
    let up = spec
        .up
        .as_deref()
        .ok_or_else(|| Status::internal(format!("{method} has no response converter")))?;

    let converted = service
        .converter_strategy
        .down(&service.converter, down, request)?;
    let mut forwarded = mutations;
    for input in &spec.deprecated_inputs {
        if let Some(value) = request.get(&input.field) {
            forwarded.push((
                input.private_field.clone(),
                service.converter.apply(&input.action, value)?,
            ));
        }
    }

    let target = match spec.route {
        Route::Next => index.saturating_add(1),
        Route::Private | Route::Backend => versions.len().saturating_sub(1),
    };
    let (next_output, private_output) =
        invoke(versions, backend, target, &spec.target, &converted, forwarded)?;
    let next = (spec.route == Route::Next).then_some(&next_output);
    let output = service
        .converter_strategy
        .up(&service.converter, up, next, &private_output)
        .map_err(Status::incompatible)?;
    Ok((output, private_output))
}
