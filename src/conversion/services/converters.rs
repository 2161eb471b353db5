//! Converter specification for one public version.
//!
//! Converters are requested for method requests and responses; every
//! message or enum they reach through a field is requested in turn, so a
//! version only carries the converters its methods actually need.

use std::collections::{BTreeMap, BTreeSet};

use crate::chain::{
    Chain, ConvertKind, EnumId, Field, FieldId, MessageId, OneofId, Propagation, TypeRef,
    VersionId, services::classify_pair,
};
use crate::conversion::{
    domain::{
        Action, Assignment, CheckTarget, ConverterKind, ConverterRef, ConverterSpec, EnumCase,
        EnumConverter, MessageConverter, OneofMapping, ReceiveTable, RequiredCheck, Shape, Side,
        VariantArm,
    },
    error::{ConversionError, ConversionResult},
    services::receivers::resolve_receivers,
};

/// A message or enum a converter is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Subject {
    Message(MessageId),
    Enum(EnumId),
}

const fn down_target(kind: ConverterKind, field: &Field) -> Option<FieldId> {
    if matches!(kind, ConverterKind::ToNext) {
        field.next
    } else {
        field.private
    }
}

const fn nested_subject(field: &Field) -> Option<Subject> {
    match field.type_ref {
        Some(TypeRef::Message(id)) => Some(Subject::Message(id)),
        Some(TypeRef::Enum(id)) => Some(Subject::Enum(id)),
        Some(TypeRef::External(_)) | None => None,
    }
}

/// Value source of one Up-converted field.
struct UpSource {
    read: Side,
    field: FieldId,
    nested: ConverterKind,
}

/// Collects the converters of one public version.
#[derive(Debug)]
pub struct ConverterPlanner<'a> {
    chain: &'a Chain,
    version: VersionId,
    specs: BTreeMap<String, ConverterSpec>,
    queued: BTreeSet<String>,
    pending: Vec<(ConverterKind, Subject)>,
    receive_tables: Vec<ReceiveTable>,
}

impl<'a> ConverterPlanner<'a> {
    /// Creates a planner for a public version.
    #[must_use]
    pub const fn new(chain: &'a Chain, version: VersionId) -> Self {
        Self {
            chain,
            version,
            specs: BTreeMap::new(),
            queued: BTreeSet::new(),
            pending: Vec::new(),
            receive_tables: Vec::new(),
        }
    }

    /// Specifies a message converter and every converter it reaches.
    ///
    /// `ToPublic` on a deprecated message is answered with its
    /// `ToDeprecatedPublic` converter.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`] met while specifying the
    /// converter or anything it reaches.
    pub fn request_message(
        &mut self,
        kind: ConverterKind,
        message: MessageId,
    ) -> ConversionResult<ConverterRef> {
        let reference = self.enqueue(kind, Subject::Message(message));
        self.drain()?;
        Ok(reference)
    }

    /// Action moving `field`'s value into `target` on a Down hop.
    ///
    /// Returns `None` when the kinds are unconvertible.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::MissingConverter`] when the nested
    /// converter would not produce `target`'s type.
    pub fn down_action(
        &mut self,
        kind: ConverterKind,
        field: FieldId,
        target: FieldId,
    ) -> ConversionResult<Option<Action>> {
        let action = self.action(kind, field, target, target)?;
        self.drain()?;
        Ok(action)
    }

    /// The specified converters by function name, and the enum receive
    /// tables behind the Up enum converters.
    #[must_use]
    pub fn finish(self) -> (BTreeMap<String, ConverterSpec>, Vec<ReceiveTable>) {
        (self.specs, self.receive_tables)
    }

    fn is_latest(&self) -> bool {
        self.chain.version(self.version).is_latest
    }

    fn subject_name(&self, subject: Subject) -> (&'a str, bool) {
        match subject {
            Subject::Message(id) => {
                let node = self.chain.message(id);
                (&node.local_name, node.deprecated)
            }
            Subject::Enum(id) => {
                let node = self.chain.enumeration(id);
                (&node.local_name, node.deprecated)
            }
        }
    }

    fn effective(&self, kind: ConverterKind, subject: Subject) -> ConverterKind {
        let (_, deprecated) = self.subject_name(subject);
        if kind == ConverterKind::ToPublic && deprecated {
            ConverterKind::ToDeprecatedPublic
        } else {
            kind
        }
    }

    fn enqueue(&mut self, kind: ConverterKind, subject: Subject) -> ConverterRef {
        let effective = self.effective(kind, subject);
        let (local_name, _) = self.subject_name(subject);
        let function = effective.function_name(local_name);
        if self.queued.insert(function.clone()) {
            self.pending.push((effective, subject));
        }
        ConverterRef {
            kind: effective,
            function,
        }
    }

    fn drain(&mut self) -> ConversionResult<()> {
        while let Some((kind, subject)) = self.pending.pop() {
            let spec = match subject {
                Subject::Message(id) => ConverterSpec::Message(self.message_converter(kind, id)?),
                Subject::Enum(id) => ConverterSpec::Enum(self.enum_converter(kind, id)?),
            };
            tracing::trace!(function = spec.function(), "converter specified");
            self.specs.insert(spec.function().to_owned(), spec);
        }
        Ok(())
    }

    /// Counterpart a converter of `kind` maps a message against.
    fn message_counterpart(&self, kind: ConverterKind, id: MessageId) -> Option<MessageId> {
        let node = self.chain.message(id);
        match kind {
            ConverterKind::ToNext => node.next,
            ConverterKind::ToPublic if !self.is_latest() => node.next,
            ConverterKind::ToPrivate
            | ConverterKind::ToPublic
            | ConverterKind::ToDeprecatedPublic => node.private,
        }
    }

    fn enum_counterpart(&self, kind: ConverterKind, id: EnumId) -> Option<EnumId> {
        let node = self.chain.enumeration(id);
        match kind {
            ConverterKind::ToNext => node.next,
            ConverterKind::ToPublic if !self.is_latest() => node.next,
            ConverterKind::ToPrivate
            | ConverterKind::ToPublic
            | ConverterKind::ToDeprecatedPublic => node.private,
        }
    }

    fn shape(&self, kind: ConverterKind) -> Shape {
        match kind {
            ConverterKind::ToNext | ConverterKind::ToPrivate => Shape::Down,
            ConverterKind::ToPublic if !self.is_latest() => Shape::UpFromNext,
            ConverterKind::ToPublic | ConverterKind::ToDeprecatedPublic => Shape::UpFromPrivate,
        }
    }

    fn message_converter(
        &mut self,
        kind: ConverterKind,
        id: MessageId,
    ) -> ConversionResult<MessageConverter> {
        let chain = self.chain;
        let message = chain.message(id);
        let function = kind.function_name(&message.local_name);
        if kind.is_down() && message.deprecated {
            return Err(ConversionError::DeprecatedDown {
                message: message.full_name.clone(),
                function,
            });
        }
        let counterpart =
            self.message_counterpart(kind, id)
                .ok_or_else(|| ConversionError::Unresolved {
                    entity: message.full_name.clone(),
                    function: function.clone(),
                })?;
        let shape = self.shape(kind);

        let mut converter = MessageConverter {
            function,
            kind,
            shape,
            message: id,
            public_name: message.full_name.clone(),
            counterpart,
            counterpart_name: chain.message(counterpart).full_name.clone(),
            private: (shape == Shape::UpFromNext)
                .then_some(message.private)
                .flatten(),
            required: Vec::new(),
            assignments: Vec::new(),
            oneofs: Vec::new(),
            unconverted: Vec::new(),
        };

        for field in chain.plain_fields(id) {
            if shape == Shape::Down {
                self.down_field(&mut converter, field)?;
            } else {
                self.up_field(&mut converter, field)?;
            }
        }
        for oneof in &message.oneofs {
            if shape == Shape::Down {
                self.down_oneof(&mut converter, *oneof)?;
            } else {
                self.up_oneof(&mut converter, *oneof)?;
            }
        }
        Ok(converter)
    }

    fn down_field(
        &mut self,
        converter: &mut MessageConverter,
        field: &Field,
    ) -> ConversionResult<()> {
        if converter.kind == ConverterKind::ToNext && field.deprecated {
            return Ok(());
        }
        let target = down_target(converter.kind, field).ok_or_else(|| {
            ConversionError::Unresolved {
                entity: self.chain.field_path(field.id),
                function: converter.function.clone(),
            }
        })?;
        match self.action(converter.kind, field.id, target, target)? {
            Some(action) => converter.assignments.push(Assignment {
                field: field.id,
                read: Side::Public,
                from: field.name.clone(),
                to: self.chain.field(target).name.clone(),
                private_from: None,
                repeated: field.repeated,
                action,
            }),
            None => converter.unconverted.push(field.name.clone()),
        }
        Ok(())
    }

    fn type_deprecated(&self, field: &Field) -> bool {
        match &field.type_ref {
            Some(TypeRef::Message(id)) => self.chain.message(*id).deprecated,
            Some(TypeRef::Enum(id)) => self.chain.enumeration(*id).deprecated,
            Some(TypeRef::External(_)) | None => false,
        }
    }

    /// Where an Up converter of `shape` reads `field` from, and which
    /// nested converter kind it calls.
    fn up_source(
        &self,
        converter: &MessageConverter,
        field: &Field,
    ) -> ConversionResult<UpSource> {
        let from_private = converter.shape == Shape::UpFromPrivate
            || field.deprecated
            || self.type_deprecated(field);
        let (read, source) = if from_private {
            (Side::Private, field.private)
        } else {
            (Side::Next, field.next)
        };
        let nested = if converter.kind == ConverterKind::ToDeprecatedPublic
            || (converter.shape == Shape::UpFromNext && from_private)
        {
            ConverterKind::ToDeprecatedPublic
        } else {
            ConverterKind::ToPublic
        };
        let field_id = source.ok_or_else(|| ConversionError::Unresolved {
            entity: self.chain.field_path(field.id),
            function: converter.function.clone(),
        })?;
        Ok(UpSource {
            read,
            field: field_id,
            nested,
        })
    }

    fn up_field(&mut self, converter: &mut MessageConverter, field: &Field) -> ConversionResult<()> {
        let source = self.up_source(converter, field)?;
        let source_name = self.chain.field(source.field).name.clone();
        if field.receive_required {
            converter.required.push(RequiredCheck {
                read: source.read,
                name: source_name.clone(),
                target: CheckTarget::Field,
                public_name: field.name.clone(),
            });
        }
        let private_from = (source.read == Side::Next)
            .then_some(field.private)
            .flatten()
            .map(|id| self.chain.field(id).name.clone());
        match self.action(source.nested, field.id, source.field, source.field)? {
            Some(action) => converter.assignments.push(Assignment {
                field: field.id,
                read: source.read,
                from: source_name,
                to: field.name.clone(),
                private_from,
                repeated: field.repeated,
                action,
            }),
            None => converter.unconverted.push(field.name.clone()),
        }
        Ok(())
    }

    fn down_oneof(
        &mut self,
        converter: &mut MessageConverter,
        id: OneofId,
    ) -> ConversionResult<()> {
        let chain = self.chain;
        let oneof = chain.oneof(id);
        let to_next = converter.kind == ConverterKind::ToNext;
        if to_next && oneof.deprecated {
            return Ok(());
        }
        let Some(target) = (if to_next { oneof.next } else { oneof.private }) else {
            return Ok(());
        };
        let mut arms = Vec::new();
        for variant in oneof.fields.iter().map(|field| chain.field(*field)) {
            if to_next && variant.deprecated {
                continue;
            }
            let Some(variant_target) = down_target(converter.kind, variant) else {
                continue;
            };
            match self.action(converter.kind, variant.id, variant_target, variant_target)? {
                Some(action) => arms.push(VariantArm {
                    from: variant.name.clone(),
                    to: chain.field(variant_target).name.clone(),
                    private_from: None,
                    action,
                }),
                None => converter.unconverted.push(variant.name.clone()),
            }
        }
        converter.oneofs.push(OneofMapping {
            oneof: id,
            read: Side::Public,
            from: oneof.name.clone(),
            to: chain.oneof(target).name.clone(),
            private_from: None,
            arms,
        });
        Ok(())
    }

    fn up_oneof(&mut self, converter: &mut MessageConverter, id: OneofId) -> ConversionResult<()> {
        let chain = self.chain;
        let oneof = chain.oneof(id);
        let from_private = converter.shape == Shape::UpFromPrivate || oneof.deprecated;
        let (read, source) = if from_private {
            (Side::Private, oneof.private)
        } else {
            (Side::Next, oneof.next)
        };
        let source = source.ok_or_else(|| ConversionError::Unresolved {
            entity: format!("{}.{}", converter.public_name, oneof.name),
            function: converter.function.clone(),
        })?;
        let source_name = chain.oneof(source).name.clone();
        if oneof.receive_required {
            converter.required.push(RequiredCheck {
                read,
                name: source_name.clone(),
                target: CheckTarget::Oneof,
                public_name: oneof.name.clone(),
            });
        }

        let mut arms = Vec::new();
        for variant in oneof.fields.iter().map(|field| chain.field(*field)) {
            if read == Side::Next && variant.deprecated {
                continue;
            }
            let Some(variant_source) = (if from_private { variant.private } else { variant.next })
            else {
                continue;
            };
            let nested = if converter.kind == ConverterKind::ToDeprecatedPublic
                || (converter.shape == Shape::UpFromNext && from_private)
            {
                ConverterKind::ToDeprecatedPublic
            } else {
                ConverterKind::ToPublic
            };
            let private_variant = if from_private {
                Some(variant_source)
            } else {
                variant.private
            };
            let checked = match (nested, nested_subject(variant)) {
                (ConverterKind::ToPublic, Some(subject))
                    if self.effective(nested, subject) == ConverterKind::ToDeprecatedPublic =>
                {
                    private_variant.unwrap_or(variant_source)
                }
                _ => variant_source,
            };
            match self.action(nested, variant.id, variant_source, checked)? {
                Some(action) => arms.push(VariantArm {
                    from: chain.field(variant_source).name.clone(),
                    to: variant.name.clone(),
                    private_from: (read == Side::Next)
                        .then_some(variant.private)
                        .flatten()
                        .map(|field| chain.field(field).name.clone()),
                    action,
                }),
                None => converter.unconverted.push(variant.name.clone()),
            }
        }
        converter.oneofs.push(OneofMapping {
            oneof: id,
            read,
            from: source_name,
            to: oneof.name.clone(),
            private_from: (read == Side::Next)
                .then_some(oneof.private)
                .flatten()
                .map(|private| chain.oneof(private).name.clone()),
            arms,
        });
        Ok(())
    }

    /// Action for a field pair. `other` is classified against `field`;
    /// `checked` is the field whose type the nested converter must map
    /// against, which differs from `other` only when a nested Up call
    /// reads the private record instead.
    fn action(
        &mut self,
        kind: ConverterKind,
        field: FieldId,
        other: FieldId,
        checked: FieldId,
    ) -> ConversionResult<Option<Action>> {
        let chain = self.chain;
        let public = chain.field(field);
        match classify_pair(public, chain.field(other)) {
            Propagation::Copy | Propagation::Shared => Ok(Some(Action::Copy)),
            Propagation::Unconvertible => {
                tracing::warn!(
                    field = %chain.field_path(field),
                    against = %chain.field_path(other),
                    "no automatic conversion; leaving the field to a converter override"
                );
                Ok(None)
            }
            Propagation::Convert(ConvertKind::Message | ConvertKind::Enum) => {
                let Some(subject) = nested_subject(public) else {
                    return Ok(None);
                };
                let effective = self.effective(kind, subject);
                let (produced, expected) = match (subject, &chain.field(checked).type_ref) {
                    (Subject::Message(id), Some(TypeRef::Message(expected))) => (
                        self.message_counterpart(effective, id).map(|m| m.index()),
                        Some((expected.index(), chain.message(*expected).full_name.clone())),
                    ),
                    (Subject::Enum(id), Some(TypeRef::Enum(expected))) => (
                        self.enum_counterpart(effective, id).map(|e| e.index()),
                        Some((expected.index(), chain.enumeration(*expected).full_name.clone())),
                    ),
                    _ => (None, None),
                };
                let (local_name, _) = self.subject_name(subject);
                let function = effective.function_name(local_name);
                match (produced, expected) {
                    (Some(produced), Some((expected, _))) if produced == expected => {
                        Ok(Some(Action::Convert(self.enqueue(kind, subject))))
                    }
                    (_, expected) => Err(ConversionError::MissingConverter {
                        field: chain.field_path(field),
                        function,
                        expected: expected.map(|(_, name)| name).unwrap_or_default(),
                    }),
                }
            }
        }
    }

    fn enum_converter(&mut self, kind: ConverterKind, id: EnumId) -> ConversionResult<EnumConverter> {
        let chain = self.chain;
        let enumeration = chain.enumeration(id);
        let function = kind.function_name(&enumeration.local_name);
        let counterpart =
            self.enum_counterpart(kind, id)
                .ok_or_else(|| ConversionError::Unresolved {
                    entity: enumeration.full_name.clone(),
                    function: function.clone(),
                })?;

        if kind.is_down() {
            let cases = enumeration
                .values
                .iter()
                .map(|value| chain.value(*value))
                .filter_map(|value| {
                    let target = if kind == ConverterKind::ToNext {
                        value.next
                    } else {
                        value.private
                    }?;
                    Some(EnumCase {
                        from: value.name.clone(),
                        to: chain.value(target).name.clone(),
                    })
                })
                .collect();
            let fallback = chain
                .enumeration(counterpart)
                .values
                .first()
                .map(|value| chain.value(*value).name.clone());
            return Ok(EnumConverter {
                function,
                kind,
                enumeration: id,
                counterpart,
                cases,
                fallback,
            });
        }

        let table = resolve_receivers(chain, id, counterpart)?;
        let cases = table
            .entries
            .iter()
            .map(|entry| EnumCase {
                from: entry.source_name.clone(),
                to: entry.public_name.clone(),
            })
            .collect();
        self.receive_tables.push(table);
        Ok(EnumConverter {
            function,
            kind,
            enumeration: id,
            counterpart,
            cases,
            fallback: None,
        })
    }
}
