//! Planning, rendering and writing the `library` chain.

use camino::Utf8Path;
use eyre::{Result, eyre};
use rstest::rstest;
use svcchain::emit::{EmitConfig, open_output_dir, render, write_artifacts};
use svcchain::error::GenerateError;
use svcchain::plan::{GeneratorConfig, generate};

use super::helpers::{PRIVATE, V1, V2, library_plan, library_set};

#[rstest]
fn versions_are_planned_in_delegation_order() {
    let plan = library_plan();

    let packages: Vec<&str> = plan
        .versions
        .iter()
        .map(|version| version.package.as_str())
        .collect();
    let keys: Vec<(&str, &str)> = plan
        .versions
        .iter()
        .map(|version| (version.validator_name.as_str(), version.converter_name.as_str()))
        .collect();

    assert_eq!(packages, [V1, V2, PRIVATE]);
    assert_eq!(
        keys,
        [
            ("library.v1.Validator", "library.v1.Converter"),
            ("library.v2.Validator", "library.v2.Converter"),
            ("private.Validator", "private.Converter"),
        ]
    );
}

#[rstest]
fn rendered_units_are_written_under_the_prefix() -> Result<()> {
    let config = GeneratorConfig::from_parameter("out_prefix=gen/catalog")?;
    let plan = generate(&library_set(), &config)?;
    let temp = tempfile::tempdir()?;
    let root = Utf8Path::from_path(temp.path()).ok_or_else(|| eyre!("non UTF-8 temp dir"))?;

    let artifacts = render(&plan, &EmitConfig::from(&config))?;
    let dir = open_output_dir(root)?;
    write_artifacts(&dir, &artifacts)?;

    let v1 = dir.read_to_string("gen/catalog/v1/service.rs.txt")?;
    let register = dir.read_to_string("gen/catalog/register.rs.txt")?;
    assert!(v1.contains("pub fn ToNextAddBookRequest("));
    assert!(v1.contains("SetAuthor"));
    assert!(register.contains("library.v2.Converter"));
    assert!(dir.exists("gen/catalog/v2/service.rs.txt"));
    assert!(dir.exists("gen/catalog/private/service.rs.txt"));
    Ok(())
}

#[rstest]
fn a_missing_private_package_stops_generation() -> Result<()> {
    let config = GeneratorConfig::from_parameter("private_package=internal")?;

    let result = generate(&library_set(), &config);

    let error = result.err().ok_or_else(|| eyre!("generation should fail"))?;
    assert!(matches!(error, GenerateError::Chain(_)));
    assert_eq!(error.to_string(), "private package 'internal' not found");
    Ok(())
}
