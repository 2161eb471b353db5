//! Tests for writing artifacts through a directory handle.

use camino::{Utf8Path, Utf8PathBuf};
use eyre::{Result, eyre};
use rstest::rstest;

use crate::emit::{Artifact, open_output_dir, write_artifacts};

fn artifact(name: &str, content: &str) -> Artifact {
    Artifact {
        name: Utf8PathBuf::from(name),
        content: content.to_owned(),
    }
}

#[rstest]
fn artifacts_are_written_under_nested_directories() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let root = Utf8Path::from_path(temp.path()).ok_or_else(|| eyre!("non UTF-8 temp dir"))?;
    let out = root.join("out");

    let dir = open_output_dir(&out)?;
    write_artifacts(
        &dir,
        &[
            artifact("service/v1/service.rs.txt", "v1"),
            artifact("service/register.rs.txt", "register"),
        ],
    )?;

    assert_eq!(dir.read_to_string("service/v1/service.rs.txt")?, "v1");
    assert_eq!(dir.read_to_string("service/register.rs.txt")?, "register");
    Ok(())
}

#[rstest]
fn existing_units_are_overwritten() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let root = Utf8Path::from_path(temp.path()).ok_or_else(|| eyre!("non UTF-8 temp dir"))?;
    let dir = open_output_dir(root)?;

    write_artifacts(&dir, &[artifact("unit.txt", "old")])?;
    write_artifacts(&dir, &[artifact("unit.txt", "new")])?;

    assert_eq!(dir.read_to_string("unit.txt")?, "new");
    Ok(())
}
