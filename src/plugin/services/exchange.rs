//! One protoc plugin exchange: request in, response out.

use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse, code_generator_response};

use crate::emit::{EmitConfig, render};
use crate::error::GenerateError;
use crate::plan::{AnnotationCarrier, GeneratorConfig, generate};
use crate::plugin::{adapters::lower_request, error::PluginResult};

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`.
pub const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// Decodes a serialized plugin request.
///
/// # Errors
///
/// Returns [`crate::plugin::PluginError::Decode`] for malformed bytes.
pub fn decode_request(bytes: &[u8]) -> PluginResult<CodeGeneratorRequest> {
    Ok(CodeGeneratorRequest::decode(bytes)?)
}

/// Generator configuration carried by a request's parameter string.
///
/// # Errors
///
/// Returns [`GenerateError::Config`] for unknown or invalid parameters.
pub fn request_config(request: &CodeGeneratorRequest) -> Result<GeneratorConfig, GenerateError> {
    Ok(GeneratorConfig::from_parameter(
        request.parameter.as_deref().unwrap_or_default(),
    )?)
}

fn generate_files(
    request: &CodeGeneratorRequest,
) -> Result<Vec<code_generator_response::File>, GenerateError> {
    let config = request_config(request)?;
    if config.annotations == AnnotationCarrier::Options {
        tracing::warn!("option extensions are not visible to the plugin; only comments are read");
    }
    tracing::debug!(
        files = request.proto_file.len(),
        to_generate = request.file_to_generate.len(),
        "plugin request received"
    );
    let set = lower_request(request);
    let plan = generate(&set, &config)?;
    let artifacts = render(&plan, &EmitConfig::from(&config))?;
    Ok(artifacts
        .into_iter()
        .map(|artifact| code_generator_response::File {
            name: Some(artifact.name.into_string()),
            content: Some(artifact.content),
            ..code_generator_response::File::default()
        })
        .collect())
}

/// Runs the generator over a decoded request.
///
/// Generation failures are reported in the response's `error` field with
/// no files, as the plugin protocol expects.
#[must_use]
pub fn handle(request: &CodeGeneratorRequest) -> CodeGeneratorResponse {
    match generate_files(request) {
        Ok(file) => CodeGeneratorResponse {
            file,
            supported_features: Some(FEATURE_PROTO3_OPTIONAL),
            ..CodeGeneratorResponse::default()
        },
        Err(error) => {
            tracing::error!(%error, "generation failed");
            CodeGeneratorResponse {
                error: Some(error.to_string()),
                supported_features: Some(FEATURE_PROTO3_OPTIONAL),
                ..CodeGeneratorResponse::default()
            }
        }
    }
}

/// Decodes a request, runs the generator and encodes the response.
///
/// # Errors
///
/// Returns [`crate::plugin::PluginError::Decode`] when the request cannot be
/// decoded.
pub fn run(bytes: &[u8]) -> PluginResult<Vec<u8>> {
    let request = decode_request(bytes)?;
    Ok(handle(&request).encode_to_vec())
}
