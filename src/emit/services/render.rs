//! Unit rendering.

use minijinja::Environment;

use crate::emit::{
    domain::{
        Artifact, EmitConfig, RegisterView, VersionView,
        templates::{REGISTER_TEMPLATE, REGISTER_TEMPLATE_NAME, VERSION_TEMPLATE, VERSION_TEMPLATE_NAME},
    },
    error::{EmitError, EmitResult},
};
use crate::plan::GenerationPlan;

fn environment() -> EmitResult<Environment<'static>> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.set_lstrip_blocks(true);
    environment
        .add_template(VERSION_TEMPLATE_NAME, VERSION_TEMPLATE)
        .map_err(|error| EmitError::template(VERSION_TEMPLATE_NAME, &error))?;
    environment
        .add_template(REGISTER_TEMPLATE_NAME, REGISTER_TEMPLATE)
        .map_err(|error| EmitError::template(REGISTER_TEMPLATE_NAME, &error))?;
    Ok(environment)
}

/// Renders one unit per chain version plus the register unit.
///
/// Units come out in delegation order with the register unit last.
///
/// # Errors
///
/// Returns [`EmitError::Template`] when a template fails to render.
pub fn render(plan: &GenerationPlan, config: &EmitConfig) -> EmitResult<Vec<Artifact>> {
    let environment = environment()?;
    let version_template = environment
        .get_template(VERSION_TEMPLATE_NAME)
        .map_err(|error| EmitError::template(VERSION_TEMPLATE_NAME, &error))?;
    let mut artifacts = Vec::with_capacity(plan.versions.len() + 1);
    for version in &plan.versions {
        let view = VersionView::from_plan(&plan.chain, version);
        let content = version_template
            .render(&view)
            .map_err(|error| EmitError::template(&version.package, &error))?;
        let name = config.version_path(plan.chain.version(version.version).short_name());
        tracing::debug!(package = %version.package, artifact = %name, "unit rendered");
        artifacts.push(Artifact { name, content });
    }

    let content = environment
        .get_template(REGISTER_TEMPLATE_NAME)
        .and_then(|template| template.render(RegisterView::from_plan(plan)))
        .map_err(|error| EmitError::template(REGISTER_TEMPLATE_NAME, &error))?;
    artifacts.push(Artifact {
        name: config.register_path(),
        content,
    });
    Ok(artifacts)
}
