//! Groups descriptor files by package.
//!
//! Comments are looked up by descriptor path in each file's
//! `source_code_info`. The numbers below are the field numbers of the
//! `FileDescriptorProto`, `DescriptorProto`, `EnumDescriptorProto` and
//! `ServiceDescriptorProto` messages.

use std::collections::{BTreeMap, HashMap};

use crate::descriptor::{
    domain::{
        Carrier, Comments, DescriptorSet, EnumDescriptor, EnumSchema, EnumValueSchema, FieldKind,
        FieldSchema, FileDescriptor, MessageDescriptor, MessageSchema, MethodSchema, OneofSchema,
        OptionMap, PackageSchema, ServiceSchema,
    },
    error::{DescriptorError, DescriptorResult},
};

const FILE_MESSAGE: i32 = 4;
const FILE_ENUM: i32 = 5;
const FILE_SERVICE: i32 = 6;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED: i32 = 3;
const MESSAGE_ENUM: i32 = 4;
const MESSAGE_ONEOF: i32 = 8;
const ENUM_VALUE: i32 = 2;
const SERVICE_METHOD: i32 = 2;

/// Groups every file of `set` into package schemas, ordered by package
/// name.
///
/// # Errors
///
/// Returns `DescriptorError` when an entity has no name or a field uses a
/// wire type the generator does not model.
pub fn ingest(set: &DescriptorSet) -> DescriptorResult<Vec<PackageSchema>> {
    let mut packages: BTreeMap<String, PackageSchema> = BTreeMap::new();
    for file in &set.file {
        let package = file.package.clone().unwrap_or_default();
        let schema = packages
            .entry(package.clone())
            .or_insert_with(|| PackageSchema {
                name: package.clone(),
                ..PackageSchema::default()
            });
        FileIngest::new(file, &package).run(schema)?;
    }
    Ok(packages.into_values().collect())
}

/// Strips the leading dot of a fully-qualified protobuf reference.
#[must_use]
pub fn trim_reference(reference: &str) -> &str {
    reference.strip_prefix('.').unwrap_or(reference)
}

fn qualify(package: &str, local: &str) -> String {
    if package.is_empty() {
        local.to_owned()
    } else {
        format!("{package}.{local}")
    }
}

fn child_path(parent: &[i32], field: i32, index: usize) -> Vec<i32> {
    let mut path = parent.to_vec();
    path.push(field);
    path.push(i32::try_from(index).unwrap_or(i32::MAX));
    path
}

struct FileIngest<'a> {
    file: &'a FileDescriptor,
    file_name: String,
    package: &'a str,
    comments: HashMap<Vec<i32>, Comments>,
}

impl<'a> FileIngest<'a> {
    fn new(file: &'a FileDescriptor, package: &'a str) -> Self {
        let comments = file
            .source_code_info
            .iter()
            .flat_map(|info| info.location.iter())
            .filter(|location| {
                location.leading_comments.is_some() || !location.leading_detached_comments.is_empty()
            })
            .map(|location| {
                (
                    location.path.clone(),
                    Comments {
                        leading: location.leading_comments.clone().unwrap_or_default(),
                        detached: location.leading_detached_comments.clone(),
                    },
                )
            })
            .collect();
        Self {
            file,
            file_name: file.name.clone().unwrap_or_default(),
            package,
            comments,
        }
    }

    fn carrier(&self, path: &[i32], options: &OptionMap) -> Carrier {
        Carrier {
            comments: self.comments.get(path).cloned().unwrap_or_default(),
            options: options.clone(),
        }
    }

    fn name(&self, name: Option<&String>, kind: &'static str) -> DescriptorResult<String> {
        name.cloned()
            .ok_or_else(|| DescriptorError::missing_name(kind, self.file_name.clone()))
    }

    fn run(&self, schema: &mut PackageSchema) -> DescriptorResult<()> {
        for (index, message) in self.file.message_type.iter().enumerate() {
            let path = child_path(&[], FILE_MESSAGE, index);
            self.message(message, None, &path, schema)?;
        }
        for (index, descriptor) in self.file.enum_type.iter().enumerate() {
            let path = child_path(&[], FILE_ENUM, index);
            let entry = self.enumeration(descriptor, None, &path)?;
            schema.enums.push(entry);
        }
        for (index, service) in self.file.service.iter().enumerate() {
            let path = child_path(&[], FILE_SERVICE, index);
            let mut methods = Vec::with_capacity(service.method.len());
            for (method_index, method) in service.method.iter().enumerate() {
                let method_path = child_path(&path, SERVICE_METHOD, method_index);
                methods.push(MethodSchema {
                    name: self.name(method.name.as_ref(), "method")?,
                    input: trim_reference(method.input_type.as_deref().unwrap_or_default())
                        .to_owned(),
                    output: trim_reference(method.output_type.as_deref().unwrap_or_default())
                        .to_owned(),
                    carrier: self.carrier(&method_path, &method.options),
                });
            }
            schema.services.push(ServiceSchema {
                name: self.name(service.name.as_ref(), "service")?,
                methods,
                carrier: self.carrier(&path, &service.options),
            });
        }
        Ok(())
    }

    fn message(
        &self,
        message: &MessageDescriptor,
        parent: Option<&str>,
        path: &[i32],
        schema: &mut PackageSchema,
    ) -> DescriptorResult<()> {
        let name = self.name(message.name.as_ref(), "message")?;
        let local_name = parent.map_or_else(|| name.clone(), |outer| format!("{outer}.{name}"));
        let full_name = qualify(self.package, &local_name);

        // Oneofs referenced only by proto3 `optional` fields are synthetic
        // and are dropped; `remap` translates descriptor indices.
        let mut remap: Vec<Option<usize>> = vec![None; message.oneof_decl.len()];
        let mut oneofs = Vec::new();
        for (index, oneof) in message.oneof_decl.iter().enumerate() {
            let synthetic = message.field.iter().all(|field| {
                field.oneof_index != i32::try_from(index).ok()
                    || field.proto3_optional.unwrap_or(false)
            });
            if synthetic {
                continue;
            }
            if let Some(slot) = remap.get_mut(index) {
                *slot = Some(oneofs.len());
            }
            oneofs.push(OneofSchema {
                name: self.name(oneof.name.as_ref(), "oneof")?,
                carrier: self.carrier(&child_path(path, MESSAGE_ONEOF, index), &oneof.options),
            });
        }

        let mut fields = Vec::with_capacity(message.field.len());
        for (index, field) in message.field.iter().enumerate() {
            let field_name = self.name(field.name.as_ref(), "field")?;
            let label = field.field_type.clone().unwrap_or_default();
            let kind = FieldKind::from_type_label(&label).ok_or_else(|| {
                DescriptorError::UnknownFieldType {
                    field: format!("{full_name}.{field_name}"),
                    field_type: label.clone(),
                }
            })?;
            let oneof = field
                .oneof_index
                .filter(|_| !field.proto3_optional.unwrap_or(false))
                .and_then(|raw| usize::try_from(raw).ok())
                .and_then(|raw| remap.get(raw).copied().flatten());
            fields.push(FieldSchema {
                name: field_name,
                number: field.number.unwrap_or_default(),
                kind,
                repeated: field.label.as_deref() == Some("LABEL_REPEATED"),
                type_name: field
                    .type_name
                    .as_deref()
                    .map(|reference| trim_reference(reference).to_owned()),
                oneof,
                carrier: self.carrier(&child_path(path, MESSAGE_FIELD, index), &field.options),
            });
        }

        schema.messages.push(MessageSchema {
            name,
            local_name: local_name.clone(),
            full_name,
            parent: parent.map(str::to_owned),
            fields,
            oneofs,
            carrier: self.carrier(path, &message.options),
        });

        for (index, nested) in message.nested_type.iter().enumerate() {
            let nested_path = child_path(path, MESSAGE_NESTED, index);
            self.message(nested, Some(&local_name), &nested_path, schema)?;
        }
        for (index, descriptor) in message.enum_type.iter().enumerate() {
            let enum_path = child_path(path, MESSAGE_ENUM, index);
            let entry = self.enumeration(descriptor, Some(&local_name), &enum_path)?;
            schema.enums.push(entry);
        }
        Ok(())
    }

    fn enumeration(
        &self,
        descriptor: &EnumDescriptor,
        parent: Option<&str>,
        path: &[i32],
    ) -> DescriptorResult<EnumSchema> {
        let name = self.name(descriptor.name.as_ref(), "enum")?;
        let local_name = parent.map_or_else(|| name.clone(), |outer| format!("{outer}.{name}"));
        let mut values = Vec::with_capacity(descriptor.value.len());
        for (index, value) in descriptor.value.iter().enumerate() {
            values.push(EnumValueSchema {
                name: self.name(value.name.as_ref(), "enum value")?,
                number: value.number.unwrap_or_default(),
                carrier: self.carrier(&child_path(path, ENUM_VALUE, index), &value.options),
            });
        }
        Ok(EnumSchema {
            name,
            full_name: qualify(self.package, &local_name),
            local_name,
            parent: parent.map(str::to_owned),
            values,
            carrier: self.carrier(path, &descriptor.options),
        })
    }
}
