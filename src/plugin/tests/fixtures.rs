//! Plugin request builders.

use prost_types::{
    DescriptorProto, FieldDescriptorProto, FileDescriptorProto, MethodDescriptorProto,
    ServiceDescriptorProto, SourceCodeInfo, compiler::CodeGeneratorRequest,
    field_descriptor_proto::{Label, Type},
    source_code_info::Location,
};
use rstest::fixture;

pub fn field(name: &str, number: i32, kind: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_owned()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(kind as i32),
        ..FieldDescriptorProto::default()
    }
}

/// A file declaring `Thing { id, legacy }` and a `Things.Get` method;
/// `comments` are attached by descriptor path.
pub fn thing_file(package: &str, comments: &[(Vec<i32>, &str)]) -> FileDescriptorProto {
    let reference = format!(".{package}.Thing");
    FileDescriptorProto {
        name: Some(format!("{}.proto", package.replace('.', "/"))),
        package: Some(package.to_owned()),
        message_type: vec![DescriptorProto {
            name: Some("Thing".to_owned()),
            field: vec![
                field("id", 1, Type::String),
                field("legacy", 2, Type::String),
            ],
            ..DescriptorProto::default()
        }],
        service: vec![ServiceDescriptorProto {
            name: Some("Things".to_owned()),
            method: vec![MethodDescriptorProto {
                name: Some("Get".to_owned()),
                input_type: Some(reference.clone()),
                output_type: Some(reference),
                ..MethodDescriptorProto::default()
            }],
            ..ServiceDescriptorProto::default()
        }],
        source_code_info: Some(SourceCodeInfo {
            location: comments
                .iter()
                .map(|(path, text)| Location {
                    path: path.clone(),
                    leading_comments: Some((*text).to_owned()),
                    ..Location::default()
                })
                .collect(),
        }),
        syntax: Some("proto3".to_owned()),
        ..FileDescriptorProto::default()
    }
}

pub fn request(files: Vec<FileDescriptorProto>, parameter: Option<&str>) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: files.iter().filter_map(|file| file.name.clone()).collect(),
        parameter: parameter.map(str::to_owned),
        proto_file: files,
        ..CodeGeneratorRequest::default()
    }
}

/// A valid two-version request: `api.v1` deprecates `Thing.legacy` and
/// `private` terminates the chain.
#[fixture]
pub fn thing_request() -> CodeGeneratorRequest {
    request(
        vec![
            thing_file("api.v1", &[(vec![4, 0, 2, 1], " gen:svc deprecated\n")]),
            thing_file("private", &[]),
        ],
        None,
    )
}
