//! Lowers protoc's descriptor protos into the descriptor set model.
//!
//! Custom option extensions are not retained by `prost-types`, so a
//! lowered set only carries comments; the option carrier needs a JSON
//! descriptor set.

use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    ServiceDescriptorProto, compiler::CodeGeneratorRequest,
};

use crate::descriptor::domain::{
    DescriptorSet, EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FileDescriptor, Location,
    MessageDescriptor, MethodDescriptor, OneofDescriptor, ServiceDescriptor, SourceCodeInfo,
};

/// Lowers every file of a plugin request.
#[must_use]
pub fn lower_request(request: &CodeGeneratorRequest) -> DescriptorSet {
    DescriptorSet {
        file: request.proto_file.iter().map(lower_file).collect(),
    }
}

/// Lowers one file descriptor.
#[must_use]
pub fn lower_file(file: &FileDescriptorProto) -> FileDescriptor {
    FileDescriptor {
        name: file.name.clone(),
        package: file.package.clone(),
        message_type: file.message_type.iter().map(lower_message).collect(),
        enum_type: file.enum_type.iter().map(lower_enum).collect(),
        service: file.service.iter().map(lower_service).collect(),
        source_code_info: file.source_code_info.as_ref().map(|info| SourceCodeInfo {
            location: info
                .location
                .iter()
                .map(|location| Location {
                    path: location.path.clone(),
                    leading_comments: location.leading_comments.clone(),
                    trailing_comments: location.trailing_comments.clone(),
                    leading_detached_comments: location.leading_detached_comments.clone(),
                })
                .collect(),
        }),
    }
}

fn lower_message(message: &DescriptorProto) -> MessageDescriptor {
    MessageDescriptor {
        name: message.name.clone(),
        field: message.field.iter().map(lower_field).collect(),
        nested_type: message.nested_type.iter().map(lower_message).collect(),
        enum_type: message.enum_type.iter().map(lower_enum).collect(),
        oneof_decl: message
            .oneof_decl
            .iter()
            .map(|oneof| OneofDescriptor {
                name: oneof.name.clone(),
                ..OneofDescriptor::default()
            })
            .collect(),
        ..MessageDescriptor::default()
    }
}

fn lower_field(field: &FieldDescriptorProto) -> FieldDescriptor {
    FieldDescriptor {
        name: field.name.clone(),
        number: field.number,
        label: field.label.map(|_| field.label().as_str_name().to_owned()),
        field_type: field.r#type.map(|_| field.r#type().as_str_name().to_owned()),
        type_name: field.type_name.clone(),
        oneof_index: field.oneof_index,
        proto3_optional: field.proto3_optional,
        ..FieldDescriptor::default()
    }
}

fn lower_enum(enumeration: &EnumDescriptorProto) -> EnumDescriptor {
    EnumDescriptor {
        name: enumeration.name.clone(),
        value: enumeration
            .value
            .iter()
            .map(|value| EnumValueDescriptor {
                name: value.name.clone(),
                number: value.number,
                ..EnumValueDescriptor::default()
            })
            .collect(),
        ..EnumDescriptor::default()
    }
}

fn lower_service(service: &ServiceDescriptorProto) -> ServiceDescriptor {
    ServiceDescriptor {
        name: service.name.clone(),
        method: service
            .method
            .iter()
            .map(|method| MethodDescriptor {
                name: method.name.clone(),
                input_type: method.input_type.clone(),
                output_type: method.output_type.clone(),
                ..MethodDescriptor::default()
            })
            .collect(),
        ..ServiceDescriptor::default()
    }
}
