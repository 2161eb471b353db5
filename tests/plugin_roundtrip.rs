//! Protocol tests for the `protoc-gen-svc` plugin: encoded requests in,
//! encoded responses out, through the library and the binary.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use eyre::{Result, ensure, eyre};
use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto, SourceCodeInfo,
};
use rstest::{fixture, rstest};
use serde_json::json;
use svcchain::plugin::{FEATURE_PROTO3_OPTIONAL, PluginError, run};

fn string_field(name: &str, number: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::String as i32),
        ..FieldDescriptorProto::default()
    }
}

/// `Order { id, note }` served by `Orders.Get`, with `id` required.
fn orders_file(package: &str) -> FileDescriptorProto {
    let order = format!(".{package}.Order");
    FileDescriptorProto {
        name: Some(format!("{}/orders.proto", package.replace('.', "/"))),
        package: Some(package.to_owned()),
        message_type: vec![DescriptorProto {
            name: Some("Order".to_owned()),
            field: vec![string_field("id", 1), string_field("note", 2)],
            ..DescriptorProto::default()
        }],
        service: vec![ServiceDescriptorProto {
            name: Some("Orders".to_owned()),
            method: vec![MethodDescriptorProto {
                name: Some("Get".to_owned()),
                input_type: Some(order.clone()),
                output_type: Some(order),
                ..MethodDescriptorProto::default()
            }],
            ..ServiceDescriptorProto::default()
        }],
        source_code_info: Some(SourceCodeInfo {
            location: vec![Location {
                path: vec![4, 0, 2, 0],
                leading_comments: Some(" gen:svc validate required=true is=uuid\n".to_owned()),
                ..Location::default()
            }],
        }),
        syntax: Some("proto3".to_owned()),
        ..FileDescriptorProto::default()
    }
}

fn request(parameter: &str) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["orders/v1/orders.proto".to_owned()],
        parameter: Some(parameter.to_owned()),
        proto_file: vec![orders_file("private"), orders_file("orders.v1")],
        ..CodeGeneratorRequest::default()
    }
}

#[fixture]
fn encoded() -> Vec<u8> {
    request("private_package=private").encode_to_vec()
}

fn file_names(response: &CodeGeneratorResponse) -> Vec<&str> {
    response
        .file
        .iter()
        .filter_map(|file| file.name.as_deref())
        .collect()
}

fn plugin_path() -> Result<PathBuf> {
    std::env::var_os("CARGO_BIN_EXE_protoc-gen-svc")
        .map(PathBuf::from)
        .ok_or_else(|| eyre!("CARGO_BIN_EXE_protoc-gen-svc is not set"))
}

fn run_plugin(args: &[&str], stdin: &[u8]) -> Result<Output> {
    let mut child = Command::new(plugin_path()?)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    child
        .stdin
        .take()
        .ok_or_else(|| eyre!("plugin stdin is not piped"))?
        .write_all(stdin)?;
    Ok(child.wait_with_output()?)
}

// ============================================================================
// Library exchange
// ============================================================================

#[rstest]
fn encoded_requests_produce_one_unit_per_version(encoded: Vec<u8>) -> Result<()> {
    let response = CodeGeneratorResponse::decode(run(&encoded)?.as_slice())?;

    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(FEATURE_PROTO3_OPTIONAL));
    assert_eq!(
        file_names(&response),
        [
            "service/v1/service.rs.txt",
            "service/private/service.rs.txt",
            "service/register.rs.txt",
        ]
    );
    let v1 = response
        .file
        .first()
        .and_then(|file| file.content.as_deref())
        .ok_or_else(|| eyre!("v1 unit has no content"))?;
    assert!(v1.contains("pub fn ToPrivateOrder("));
    Ok(())
}

#[rstest]
fn truncated_requests_fail_to_decode(encoded: Vec<u8>) {
    let truncated = encoded
        .get(..encoded.len().saturating_sub(3))
        .unwrap_or_default();

    assert!(matches!(run(truncated), Err(PluginError::Decode(_))));
}

// ============================================================================
// Binary
// ============================================================================

#[rstest]
fn the_binary_speaks_the_plugin_protocol(encoded: Vec<u8>) -> Result<()> {
    let output = run_plugin(&[], &encoded)?;

    ensure!(output.status.success(), "plugin exited with {}", output.status);
    let response = CodeGeneratorResponse::decode(output.stdout.as_slice())?;
    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 3);
    Ok(())
}

#[rstest]
fn the_binary_reports_generation_failures() -> Result<()> {
    let output = run_plugin(&[], &request("colour=red").encode_to_vec())?;

    ensure!(!output.status.success(), "expected failure status");
    let response = CodeGeneratorResponse::decode(output.stdout.as_slice())?;
    assert_eq!(response.error.as_deref(), Some("unknown parameter 'colour'"));
    assert!(response.file.is_empty());
    Ok(())
}

#[rstest]
fn the_binary_generates_from_a_json_descriptor_set() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let root = Utf8Path::from_path(temp.path()).ok_or_else(|| eyre!("non UTF-8 temp dir"))?;
    let order = |package: &str| {
        json!({
            "name": format!("{package}.proto"),
            "package": package,
            "messageType": [{ "name": "Order", "field": [
                { "name": "id", "number": 1, "label": "LABEL_OPTIONAL", "type": "TYPE_STRING" }
            ]}],
            "service": [{ "name": "Orders", "method": [{
                "name": "Get",
                "inputType": format!(".{package}.Order"),
                "outputType": format!(".{package}.Order")
            }]}]
        })
    };
    let dir = Dir::open_ambient_dir(root, ambient_authority())?;
    dir.write(
        "orders.json",
        json!({ "file": [order("orders.v1"), order("internal")] }).to_string(),
    )?;
    let descriptors = root.join("orders.json");
    let out = root.join("out");

    let output = run_plugin(
        &[
            "--descriptor-set",
            descriptors.as_str(),
            "--private-package",
            "internal",
            "--out-dir",
            out.as_str(),
        ],
        &[],
    )?;

    ensure!(
        output.status.success(),
        "generation failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.is_file("out/service/v1/service.rs.txt"));
    assert!(dir.is_file("out/service/internal/service.rs.txt"));
    assert!(dir.is_file("out/service/register.rs.txt"));
    Ok(())
}
