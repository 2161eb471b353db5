//! Generates chained, versioned service adapters.
//!
//! Usage:
//!
//! ```text
//! protoc --plugin=protoc-gen-svc --svc_out=gen --svc_opt=private_package=private api.proto
//! protoc-gen-svc --descriptor-set people.json --out-dir gen [--verbose]
//! ```
//!
//! Without `--descriptor-set` the binary speaks the protoc plugin protocol:
//! a `CodeGeneratorRequest` on stdin and a `CodeGeneratorResponse` on
//! stdout. Failures are reported in the response and exit with status 1.
//! Logs always go to stderr.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use clap::Parser;
use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use svcchain::descriptor::DescriptorSet;
use svcchain::emit::{EmitConfig, open_output_dir, render, write_artifacts};
use svcchain::error::GenerateError;
use svcchain::plan::{
    AnnotationCarrier, DEFAULT_OUT_PREFIX, DEFAULT_PRIVATE_PACKAGE, GeneratorConfig, generate,
};
use svcchain::plugin::{PluginError, decode_request, handle, request_config};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "protoc-gen-svc", version, about)]
struct Cli {
    /// JSON descriptor set to generate from; omit to run as a protoc plugin.
    #[arg(long)]
    descriptor_set: Option<Utf8PathBuf>,

    /// Package of the private service.
    #[arg(long, default_value = DEFAULT_PRIVATE_PACKAGE)]
    private_package: String,

    /// Where validation and conversion annotations are read from.
    #[arg(long, value_enum, default_value_t = AnnotationCarrier::Comments)]
    annotations: AnnotationCarrier,

    /// Directory the generated units are written under.
    #[arg(long, default_value = ".")]
    out_dir: Utf8PathBuf,

    /// Path prefix of the generated units inside the output directory.
    #[arg(long, default_value = DEFAULT_OUT_PREFIX)]
    out_prefix: Utf8PathBuf,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read descriptor set {path}: {source}")]
    ReadDescriptorSet {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Plugin(#[from] PluginError),

    #[error("generation failed: {0}")]
    Reported(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let outcome = match cli.descriptor_set.clone() {
        Some(path) => {
            init_tracing(cli.verbose);
            run_descriptor_set(&cli, &path)
        }
        None => run_plugin(cli.verbose),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "protoc-gen-svc failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(LevelFilter::DEBUG.to_string())
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_ansi(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("a global tracing subscriber is already installed");
    }
}

fn run_descriptor_set(cli: &Cli, path: &Utf8Path) -> Result<(), CliError> {
    let config = GeneratorConfig {
        private_package: cli.private_package.clone(),
        annotations: cli.annotations,
        verbose: cli.verbose,
        out_prefix: cli.out_prefix.clone(),
    };
    let text = read_descriptor_set(path).map_err(|source| CliError::ReadDescriptorSet {
        path: path.to_owned(),
        source,
    })?;
    let set = DescriptorSet::from_json(&text).map_err(GenerateError::from)?;
    let plan = generate(&set, &config)?;
    if config.verbose {
        match serde_json::to_string_pretty(&plan) {
            Ok(dump) => tracing::debug!(plan = %dump, "generation plan"),
            Err(error) => tracing::warn!(%error, "generation plan could not be serialized"),
        }
    }
    let artifacts = render(&plan, &EmitConfig::from(&config)).map_err(GenerateError::from)?;
    let dir = open_output_dir(&cli.out_dir).map_err(GenerateError::from)?;
    write_artifacts(&dir, &artifacts).map_err(GenerateError::from)?;
    tracing::info!(
        artifacts = artifacts.len(),
        out_dir = %cli.out_dir,
        "generation complete"
    );
    Ok(())
}

fn read_descriptor_set(path: &Utf8Path) -> io::Result<String> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "descriptor set path has no file name")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

fn read_request() -> Result<CodeGeneratorRequest, PluginError> {
    let mut bytes = Vec::new();
    io::stdin().lock().read_to_end(&mut bytes)?;
    decode_request(&bytes)
}

fn run_plugin(verbose: bool) -> Result<(), CliError> {
    let request = read_request().inspect_err(|_| init_tracing(verbose))?;
    let requested_verbose = request_config(&request).is_ok_and(|config| config.verbose);
    init_tracing(verbose || requested_verbose);

    let response = handle(&request);
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(&response.encode_to_vec())
        .and_then(|()| stdout.flush())
        .map_err(PluginError::from)?;
    response.error.map_or(Ok(()), |message| Err(CliError::Reported(message)))
}
