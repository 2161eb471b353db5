//! The generation pipeline.

use crate::chain::{Chain, ChainBuilder, ChainResult};
use crate::conversion::specify_version;
use crate::descriptor::{
    AnnotationSource, CommentAnnotations, DescriptorSet, OptionAnnotations, PackageSchema, ingest,
};
use crate::error::GenerateError;
use crate::plan::domain::{AnnotationCarrier, GenerationPlan, GeneratorConfig, VersionPlan};
use crate::validation::RuleDeriver;

/// Runs ingestion, chain building, rule derivation and converter
/// specification over a descriptor set.
///
/// # Errors
///
/// Returns the first failure of any stage; nothing is generated from a
/// partially resolved chain.
pub fn generate(
    set: &DescriptorSet,
    config: &GeneratorConfig,
) -> Result<GenerationPlan, GenerateError> {
    let packages = ingest(set)?;
    tracing::debug!(packages = packages.len(), "descriptors ingested");
    let chain = build_chain(&packages, config)?;
    plan_chain(chain)
}

/// Builds and resolves the chain with the configured annotation carrier.
///
/// # Errors
///
/// Returns [`crate::chain::ChainError`] on configuration or resolution
/// failures.
pub fn build_chain(packages: &[PackageSchema], config: &GeneratorConfig) -> ChainResult<Chain> {
    let annotations: &dyn AnnotationSource = match config.annotations {
        AnnotationCarrier::Comments => &CommentAnnotations,
        AnnotationCarrier::Options => &OptionAnnotations,
    };
    ChainBuilder::new(annotations, config.private_package.as_str()).build(packages)
}

/// Derives validators and converters for every version of a resolved
/// chain.
///
/// # Errors
///
/// Returns [`GenerateError::Rule`] or [`GenerateError::Conversion`].
pub fn plan_chain(chain: Chain) -> Result<GenerationPlan, GenerateError> {
    let deriver = RuleDeriver::new(&chain);
    let mut versions = Vec::with_capacity(chain.versions().len());
    for version in chain.versions() {
        let validators = deriver.derive_version(version.id)?;
        let conversions = specify_version(&chain, version.id)?;
        tracing::info!(
            package = %version.package,
            validators = validators.len(),
            converters = conversions.converters.len(),
            "version planned"
        );
        versions.push(VersionPlan {
            version: version.id,
            package: version.package.clone(),
            service: version.service.clone(),
            validator_name: VersionPlan::validator_key(&version.package),
            converter_name: VersionPlan::converter_key(&version.package),
            validators,
            converters: conversions.converters,
            methods: conversions.methods,
            mutators: conversions.mutators,
            receive_tables: conversions.receive_tables,
        });
    }
    Ok(GenerationPlan { chain, versions })
}
