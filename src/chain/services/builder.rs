//! Builds the version chain from ingested packages.
//!
//! Public packages are ordered by a numeric-aware comparison of their
//! names (`v2` before `v10`) and the private package is appended as the
//! terminal sink. Each version delegates to the one after it. Once the
//! arena is populated, correspondences are resolved and fields classified,
//! after which the chain is frozen.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::chain::{
    domain::{
        Chain, Enum, EnumId, EnumValue, EnumValueId, Field, FieldId, Message, MessageId, Method,
        MethodId, Oneof, OneofId, Propagation, TypeRef, Version, VersionId,
    },
    error::{ChainError, ChainResult},
    services::{classifier, resolver},
};
use crate::descriptor::{
    AnnotationSource, EntityKind, FieldKind, MessageSchema, PackageSchema, ServiceSchema,
    ports::AnnotationResult,
};

/// Builds a resolved [`Chain`] from package schemas.
pub struct ChainBuilder<'a> {
    annotations: &'a dyn AnnotationSource,
    private_package: String,
}

impl<'a> ChainBuilder<'a> {
    /// Creates a builder reading annotations through `annotations`.
    #[must_use]
    pub fn new(annotations: &'a dyn AnnotationSource, private_package: impl Into<String>) -> Self {
        Self {
            annotations,
            private_package: private_package.into(),
        }
    }

    /// Orders the versions, populates the arena and resolves every
    /// correspondence.
    ///
    /// # Errors
    ///
    /// Returns `ChainError` when the private package is missing, a package
    /// declares several services, an annotation is malformed, or any
    /// entity fails to resolve its counterpart.
    pub fn build(&self, packages: &[PackageSchema]) -> ChainResult<Chain> {
        let ordered = self.order(packages)?;
        let mut arena = Arena {
            annotations: self.annotations,
            chain: Chain::default(),
            messages_by_name: HashMap::new(),
            enums_by_name: HashMap::new(),
        };
        for (package, service) in &ordered {
            arena.add_version(package, service)?;
        }
        arena.link_versions();
        arena.inherit_deprecation();

        let mut chain = arena.chain;
        resolver::resolve(&mut chain)?;
        classifier::classify(&mut chain);
        tracing::debug!(
            versions = chain.versions().len(),
            messages = chain.messages.len(),
            fields = chain.fields.len(),
            "chain built"
        );
        Ok(chain)
    }

    fn order<'p>(
        &self,
        packages: &'p [PackageSchema],
    ) -> ChainResult<Vec<(&'p PackageSchema, &'p ServiceSchema)>> {
        let private = packages
            .iter()
            .find(|package| package.name == self.private_package)
            .ok_or_else(|| ChainError::PrivatePackageNotFound(self.private_package.clone()))?;
        let private_service = single_service(private)?
            .ok_or_else(|| ChainError::PrivateServiceMissing(private.name.clone()))?;

        let mut public = Vec::new();
        for package in packages.iter().filter(|p| p.name != self.private_package) {
            match single_service(package)? {
                Some(service) => public.push((package, service)),
                None => {
                    tracing::warn!(package = %package.name, "skipping package without a service");
                }
            }
        }
        if public.is_empty() {
            return Err(ChainError::EmptyChain(self.private_package.clone()));
        }
        public.sort_by(|(a, _), (b, _)| version_order(&a.name, &b.name));
        public.push((private, private_service));
        Ok(public)
    }
}

fn single_service(package: &PackageSchema) -> ChainResult<Option<&ServiceSchema>> {
    match package.services.as_slice() {
        [] => Ok(None),
        [service] => Ok(Some(service)),
        [first, second, ..] => Err(ChainError::AmbiguousService {
            package: package.name.clone(),
            first: first.name.clone(),
            second: second.name.clone(),
        }),
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Segment {
    Text(String),
    Number(u64),
}

fn natural_key(name: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut digits = String::new();
    for ch in name.chars() {
        if ch.is_ascii_digit() {
            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            digits.push(ch);
        } else {
            if !digits.is_empty() {
                let value = digits.parse().unwrap_or(u64::MAX);
                digits.clear();
                segments.push(Segment::Number(value));
            }
            text.push(ch);
        }
    }
    if !text.is_empty() {
        segments.push(Segment::Text(text));
    }
    if !digits.is_empty() {
        segments.push(Segment::Number(digits.parse().unwrap_or(u64::MAX)));
    }
    segments
}

/// Numeric-aware ordering of package names.
#[must_use]
pub fn version_order(a: &str, b: &str) -> Ordering {
    natural_key(a).cmp(&natural_key(b))
}

struct Arena<'a> {
    annotations: &'a dyn AnnotationSource,
    chain: Chain,
    messages_by_name: HashMap<String, MessageId>,
    enums_by_name: HashMap<String, EnumId>,
}

fn annotated<T>(kind: EntityKind, entity: &str, result: AnnotationResult<T>) -> ChainResult<T> {
    result.map_err(|source| ChainError::annotation(kind, entity, source))
}

impl Arena<'_> {
    fn add_version(&mut self, package: &PackageSchema, service: &ServiceSchema) -> ChainResult<()> {
        let id = VersionId::new(self.chain.versions.len());
        self.chain.versions.push(Version {
            id,
            package: package.name.clone(),
            service: service.name.clone(),
            is_private: false,
            is_latest: false,
            next: None,
            private: None,
            messages: Vec::new(),
            enums: Vec::new(),
            methods: Vec::new(),
            message_index: BTreeMap::new(),
            enum_index: BTreeMap::new(),
            method_index: BTreeMap::new(),
        });

        let mut message_ids = Vec::with_capacity(package.messages.len());
        for schema in &package.messages {
            message_ids.push(self.add_message(id, schema)?);
        }
        for schema in &package.enums {
            self.add_enum(id, schema)?;
        }
        for (message, schema) in message_ids.into_iter().zip(&package.messages) {
            self.add_fields(message, schema)?;
        }
        for schema in &service.methods {
            self.add_method(id, package, schema)?;
        }
        Ok(())
    }

    fn add_message(&mut self, version: VersionId, schema: &MessageSchema) -> ChainResult<MessageId> {
        let id = MessageId::new(self.chain.messages.len());
        let kind = EntityKind::Message;
        let entity = schema.full_name.as_str();
        let deprecated = annotated(kind, entity, self.annotations.deprecated(kind, &schema.carrier))?;
        let delegate = annotated(
            kind,
            entity,
            self.annotations.delegate_name(kind, &schema.carrier),
        )?;
        let parent = schema
            .parent
            .as_deref()
            .and_then(|local| self.chain.find_message(version, local));
        self.chain.messages.push(Message {
            id,
            version,
            name: schema.name.clone(),
            local_name: schema.local_name.clone(),
            full_name: schema.full_name.clone(),
            parent,
            fields: Vec::new(),
            oneofs: Vec::new(),
            deprecated,
            delegate,
            is_input: false,
            is_output: false,
            next: None,
            private: None,
        });
        let node = self.version_mut(version);
        node.messages.push(id);
        node.message_index.insert(schema.local_name.clone(), id);
        self.messages_by_name.insert(schema.full_name.clone(), id);
        Ok(id)
    }

    fn add_enum(
        &mut self,
        version: VersionId,
        schema: &crate::descriptor::EnumSchema,
    ) -> ChainResult<()> {
        let id = EnumId::new(self.chain.enums.len());
        let kind = EntityKind::Enum;
        let entity = schema.full_name.as_str();
        let deprecated = annotated(kind, entity, self.annotations.deprecated(kind, &schema.carrier))?;
        let delegate = annotated(
            kind,
            entity,
            self.annotations.delegate_name(kind, &schema.carrier),
        )?;

        let mut values = Vec::with_capacity(schema.values.len());
        for value in &schema.values {
            let value_id = EnumValueId::new(self.chain.values.len());
            let value_kind = EntityKind::EnumValue;
            let value_entity = format!("{}.{}", schema.full_name, value.name);
            let carrier = &value.carrier;
            let value_deprecated = annotated(
                value_kind,
                &value_entity,
                self.annotations.deprecated(value_kind, carrier),
            )?;
            let value_delegate = annotated(
                value_kind,
                &value_entity,
                self.annotations.delegate_name(value_kind, carrier),
            )?;
            let receive = annotated(
                value_kind,
                &value_entity,
                self.annotations.receive_directives(value_kind, carrier),
            )?;
            self.chain.values.push(EnumValue {
                id: value_id,
                enumeration: id,
                name: value.name.clone(),
                number: value.number,
                deprecated: value_deprecated,
                delegate: value_delegate,
                receive: receive.names,
                next: None,
                private: None,
            });
            values.push(value_id);
        }

        let parent = schema
            .parent
            .as_deref()
            .and_then(|local| self.chain.find_message(version, local));
        self.chain.enums.push(Enum {
            id,
            version,
            name: schema.name.clone(),
            local_name: schema.local_name.clone(),
            full_name: schema.full_name.clone(),
            parent,
            values,
            deprecated,
            delegate,
            next: None,
            private: None,
        });
        let node = self.version_mut(version);
        node.enums.push(id);
        node.enum_index.insert(schema.local_name.clone(), id);
        self.enums_by_name.insert(schema.full_name.clone(), id);
        Ok(())
    }

    fn add_fields(&mut self, message: MessageId, schema: &MessageSchema) -> ChainResult<()> {
        let mut oneof_ids = Vec::with_capacity(schema.oneofs.len());
        for oneof in &schema.oneofs {
            let id = OneofId::new(self.chain.oneofs.len());
            let kind = EntityKind::Oneof;
            let entity = format!("{}.{}", schema.full_name, oneof.name);
            let carrier = &oneof.carrier;
            let deprecated =
                annotated(kind, &entity, self.annotations.deprecated(kind, carrier))?;
            let delegate =
                annotated(kind, &entity, self.annotations.delegate_name(kind, carrier))?;
            let validate =
                annotated(kind, &entity, self.annotations.validate_directives(kind, carrier))?;
            let receive =
                annotated(kind, &entity, self.annotations.receive_directives(kind, carrier))?;
            self.chain.oneofs.push(Oneof {
                id,
                message,
                name: oneof.name.clone(),
                fields: Vec::new(),
                deprecated,
                delegate,
                required: validate.required,
                receive_required: receive.required,
                next: None,
                private: None,
            });
            oneof_ids.push(id);
        }

        for field in &schema.fields {
            let id = FieldId::new(self.chain.fields.len());
            let kind = EntityKind::Field;
            let entity = format!("{}.{}", schema.full_name, field.name);
            let carrier = &field.carrier;
            let deprecated =
                annotated(kind, &entity, self.annotations.deprecated(kind, carrier))?;
            let delegate =
                annotated(kind, &entity, self.annotations.delegate_name(kind, carrier))?;
            let validate =
                annotated(kind, &entity, self.annotations.validate_directives(kind, carrier))?;
            let receive =
                annotated(kind, &entity, self.annotations.receive_directives(kind, carrier))?;
            let type_ref = field.type_name.as_ref().map(|name| match field.kind {
                FieldKind::Message => self
                    .messages_by_name
                    .get(name)
                    .map_or_else(|| TypeRef::External(name.clone()), |id| TypeRef::Message(*id)),
                FieldKind::Enum => self
                    .enums_by_name
                    .get(name)
                    .map_or_else(|| TypeRef::External(name.clone()), |id| TypeRef::Enum(*id)),
                FieldKind::Scalar(_) => TypeRef::External(name.clone()),
            });
            if field.kind == FieldKind::Enum {
                if let Some(TypeRef::External(type_name)) = &type_ref {
                    return Err(ChainError::MessageTypeNotFound {
                        entity,
                        type_name: type_name.clone(),
                    });
                }
            }
            let oneof = field.oneof.and_then(|index| oneof_ids.get(index).copied());
            self.chain.fields.push(Field {
                id,
                message,
                name: field.name.clone(),
                number: field.number,
                kind: field.kind,
                repeated: field.repeated,
                type_ref,
                oneof,
                deprecated,
                delegate,
                validate,
                receive_required: receive.required,
                next: None,
                private: None,
                propagation: Propagation::default(),
            });
            if let Some(oneof_id) = oneof {
                self.oneof_mut(oneof_id).fields.push(id);
            }
            self.message_mut(message).fields.push(id);
        }
        self.message_mut(message).oneofs = oneof_ids;
        Ok(())
    }

    fn add_method(
        &mut self,
        version: VersionId,
        package: &PackageSchema,
        schema: &crate::descriptor::MethodSchema,
    ) -> ChainResult<()> {
        let id = MethodId::new(self.chain.methods.len());
        let kind = EntityKind::Method;
        let entity = format!("{}.{}", package.name, schema.name);
        let deprecated =
            annotated(kind, &entity, self.annotations.deprecated(kind, &schema.carrier))?;
        let delegate = annotated(
            kind,
            &entity,
            self.annotations.delegate_name(kind, &schema.carrier),
        )?;
        let lookup = |type_name: &str| {
            self.messages_by_name
                .get(type_name)
                .copied()
                .ok_or_else(|| ChainError::MessageTypeNotFound {
                    entity: entity.clone(),
                    type_name: type_name.to_owned(),
                })
        };
        let input = lookup(&schema.input)?;
        let output = lookup(&schema.output)?;
        self.message_mut(input).is_input = true;
        self.message_mut(output).is_output = true;
        self.chain.methods.push(Method {
            id,
            version,
            name: schema.name.clone(),
            input,
            output,
            deprecated,
            delegate,
            next: None,
            private: None,
        });
        let node = self.version_mut(version);
        node.methods.push(id);
        node.method_index.insert(schema.name.clone(), id);
        Ok(())
    }

    fn link_versions(&mut self) {
        let count = self.chain.versions.len();
        let private = count.checked_sub(1).map(VersionId::new);
        for (index, version) in self.chain.versions.iter_mut().enumerate() {
            let is_private = index + 1 == count;
            version.is_private = is_private;
            version.is_latest = index + 2 == count;
            if !is_private {
                version.next = Some(VersionId::new(index + 1));
                version.private = private;
            }
        }
    }

    /// Fields and oneofs inherit their message's deprecation, values their
    /// enum's. An enum referenced only from deprecated messages is itself
    /// deprecated.
    fn inherit_deprecation(&mut self) {
        let mut referenced: HashMap<EnumId, bool> = HashMap::new();
        for field in &self.chain.fields {
            if let Some(TypeRef::Enum(enum_id)) = field.type_ref {
                let owner_deprecated = self.chain.message(field.message).deprecated;
                let all = referenced.entry(enum_id).or_insert(true);
                *all = *all && owner_deprecated;
            }
        }
        for enumeration in &mut self.chain.enums {
            if referenced.get(&enumeration.id).copied().unwrap_or(false) {
                enumeration.deprecated = true;
            }
        }

        let message_deprecated: Vec<bool> =
            self.chain.messages.iter().map(|message| message.deprecated).collect();
        let enum_deprecated: Vec<bool> =
            self.chain.enums.iter().map(|enumeration| enumeration.deprecated).collect();
        for field in &mut self.chain.fields {
            field.deprecated |= message_deprecated
                .get(field.message.index())
                .copied()
                .unwrap_or(false);
        }
        for oneof in &mut self.chain.oneofs {
            oneof.deprecated |= message_deprecated
                .get(oneof.message.index())
                .copied()
                .unwrap_or(false);
        }
        for value in &mut self.chain.values {
            value.deprecated |= enum_deprecated
                .get(value.enumeration.index())
                .copied()
                .unwrap_or(false);
        }
    }

    fn version_mut(&mut self, id: VersionId) -> &mut Version {
        self.chain.version_mut(id)
    }

    fn message_mut(&mut self, id: MessageId) -> &mut Message {
        self.chain.message_mut(id)
    }

    fn oneof_mut(&mut self, id: OneofId) -> &mut Oneof {
        self.chain.oneof_mut(id)
    }
}
