//! Generator configuration.

use std::fmt;
use std::str::FromStr;

use camino::Utf8PathBuf;

use crate::plan::error::ConfigError;

/// Default name of the private package.
pub const DEFAULT_PRIVATE_PACKAGE: &str = "private";

/// Default directory prefix of the generated units.
pub const DEFAULT_OUT_PREFIX: &str = "service";

/// Where annotation facts are carried in the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum AnnotationCarrier {
    /// `gen:svc` comment lines.
    #[default]
    Comments,
    /// Typed option extensions.
    Options,
}

impl AnnotationCarrier {
    /// Parameter spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comments => "comments",
            Self::Options => "options",
        }
    }
}

impl fmt::Display for AnnotationCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationCarrier {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "comments" => Ok(Self::Comments),
            "options" => Ok(Self::Options),
            other => Err(ConfigError::invalid("annotations", other)),
        }
    }
}

/// Settings of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Package of the private service.
    pub private_package: String,
    /// Annotation carrier.
    pub annotations: AnnotationCarrier,
    /// Log at debug level and dump the plan.
    pub verbose: bool,
    /// Directory prefix of generated units.
    pub out_prefix: Utf8PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            private_package: DEFAULT_PRIVATE_PACKAGE.to_owned(),
            annotations: AnnotationCarrier::default(),
            verbose: false,
            out_prefix: Utf8PathBuf::from(DEFAULT_OUT_PREFIX),
        }
    }
}

impl GeneratorConfig {
    /// Parses a protoc plugin parameter string such as
    /// `verbose,private_package=internal,annotations=options`.
    ///
    /// Empty entries are ignored; unset keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unknown keys and invalid values.
    pub fn from_parameter(parameter: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for entry in parameter.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
            match key {
                "verbose" => {
                    config.verbose = match value {
                        "" | "true" => true,
                        "false" => false,
                        other => return Err(ConfigError::invalid(key, other)),
                    };
                }
                "private_package" if !value.is_empty() => {
                    config.private_package = value.to_owned();
                }
                "annotations" => config.annotations = value.parse()?,
                "out_prefix" if !value.is_empty() => {
                    config.out_prefix = Utf8PathBuf::from(value);
                }
                "private_package" | "out_prefix" => {
                    return Err(ConfigError::invalid(key, value));
                }
                other => return Err(ConfigError::UnknownParameter(other.to_owned())),
            }
        }
        Ok(config)
    }
}
