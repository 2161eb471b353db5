//! Writing artifacts through a capability directory.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::emit::{
    domain::Artifact,
    error::{EmitError, EmitResult},
};

/// Opens `path` as the output directory, creating it when missing.
///
/// # Errors
///
/// Returns [`EmitError::Write`] when the directory cannot be created or
/// opened.
pub fn open_output_dir(path: &Utf8Path) -> EmitResult<Dir> {
    let write_error = |source| EmitError::Write {
        path: path.to_path_buf(),
        source,
    };
    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(write_error)?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(write_error)
}

/// Writes every artifact under `dir`, creating parent directories.
///
/// # Errors
///
/// Returns [`EmitError::Write`] naming the first artifact that could not
/// be written.
pub fn write_artifacts(dir: &Dir, artifacts: &[Artifact]) -> EmitResult<()> {
    for artifact in artifacts {
        let write_error = |source| EmitError::Write {
            path: artifact.name.clone(),
            source,
        };
        if let Some(parent) = artifact.name.parent().filter(|p| !p.as_str().is_empty()) {
            dir.create_dir_all(parent).map_err(write_error)?;
        }
        dir.write(&artifact.name, &artifact.content)
            .map_err(write_error)?;
        tracing::debug!(artifact = %artifact.name, "artifact written");
    }
    Ok(())
}
