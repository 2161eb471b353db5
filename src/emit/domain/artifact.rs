//! Generated artifacts.

use camino::{Utf8Path, Utf8PathBuf};

use crate::plan::{DEFAULT_OUT_PREFIX, GeneratorConfig};

/// Register unit file name.
pub const REGISTER_FILE: &str = "register.rs.txt";

/// Version unit file name.
pub const SERVICE_FILE: &str = "service.rs.txt";

/// A rendered unit and where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Path relative to the output directory.
    pub name: Utf8PathBuf,
    /// Rendered content.
    pub content: String,
}

/// Emitter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitConfig {
    /// Directory prefix of every unit.
    pub out_prefix: Utf8PathBuf,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            out_prefix: Utf8PathBuf::from(DEFAULT_OUT_PREFIX),
        }
    }
}

impl From<&GeneratorConfig> for EmitConfig {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            out_prefix: config.out_prefix.clone(),
        }
    }
}

impl EmitConfig {
    /// Path of a version's unit, `<prefix>/<version>/service.rs.txt`.
    #[must_use]
    pub fn version_path(&self, short_name: &str) -> Utf8PathBuf {
        self.out_prefix.join(short_name).join(SERVICE_FILE)
    }

    /// Path of the register unit, `<prefix>/register.rs.txt`.
    #[must_use]
    pub fn register_path(&self) -> Utf8PathBuf {
        self.out_prefix.join(REGISTER_FILE)
    }

    /// Directory prefix of every unit.
    #[must_use]
    pub fn prefix(&self) -> &Utf8Path {
        &self.out_prefix
    }
}
