//! Correspondence resolution across chain hops.
//!
//! Every public entity looks up its counterpart by delegate name, else by
//! its own name. Deprecated entities and entities of the latest public
//! version bypass the next version and resolve straight against the
//! private one; all others resolve against the next version and inherit
//! their private counterpart from it. Versions are resolved from the one
//! adjacent to private backwards so that inherited links already exist.

use std::collections::HashMap;

use crate::chain::{
    domain::{Chain, EnumId, FieldId, MessageId, MethodId, VersionId},
    error::{ChainError, ChainResult},
};

/// Resolves every correspondence of every public version in place.
///
/// # Errors
///
/// Returns the first resolution failure; no partially resolved chain is
/// ever handed out.
pub fn resolve(chain: &mut Chain) -> ChainResult<()> {
    let public: Vec<VersionId> = chain.public_versions().map(|version| version.id).collect();
    for version in public.into_iter().rev() {
        resolve_version(chain, version)?;
    }
    Ok(())
}

/// Which version an entity resolves against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hop {
    Next(VersionId),
    Private(VersionId),
}

impl Hop {
    const fn version(self) -> VersionId {
        match self {
            Self::Next(id) | Self::Private(id) => id,
        }
    }
}

fn hop_for(chain: &Chain, version: VersionId, bypass: bool) -> Option<Hop> {
    let node = chain.version(version);
    if bypass || node.is_latest {
        node.private.map(Hop::Private)
    } else {
        node.next.map(Hop::Next)
    }
}

fn resolve_version(chain: &mut Chain, version: VersionId) -> ChainResult<()> {
    let messages = chain.version(version).messages.clone();
    for message in &messages {
        resolve_message(chain, *message)?;
    }
    let enums = chain.version(version).enums.clone();
    for enumeration in enums {
        resolve_enum(chain, enumeration)?;
    }
    for message in messages {
        resolve_oneofs(chain, message)?;
        resolve_fields(chain, message)?;
    }
    let methods = chain.version(version).methods.clone();
    for method in methods {
        resolve_method(chain, method)?;
    }
    Ok(())
}

/// Local name looked up for a nested or top-level type: the parent's
/// counterpart name plus the child's target name.
fn target_local_name(
    chain: &Chain,
    parent: Option<MessageId>,
    name: &str,
    delegate: Option<&str>,
    hop: Hop,
) -> String {
    let simple = delegate.unwrap_or(name);
    let parent_counterpart = parent.and_then(|id| {
        let node = chain.message(id);
        match hop {
            Hop::Next(_) => node.next,
            Hop::Private(_) => node.private,
        }
    });
    parent_counterpart.map_or_else(
        || simple.to_owned(),
        |id| format!("{}.{simple}", chain.message(id).local_name),
    )
}

fn resolve_message(chain: &mut Chain, id: MessageId) -> ChainResult<()> {
    let node = chain.message(id);
    let Some(hop) = hop_for(chain, node.version, node.deprecated) else {
        return Ok(());
    };
    let target = target_local_name(chain, node.parent, &node.name, node.delegate.as_deref(), hop);
    let found = chain
        .find_message(hop.version(), &target)
        .ok_or_else(|| ChainError::MessageNotFound {
            message: node.full_name.clone(),
            package: chain.version(hop.version()).package.clone(),
            target: target.clone(),
        })?;
    let private = match hop {
        Hop::Private(_) => Some(found),
        Hop::Next(_) => chain.message(found).private,
    };
    tracing::trace!(message = %node.full_name, %target, "message resolved");
    let slot = chain.message_mut(id);
    if let Hop::Next(_) = hop {
        slot.next = Some(found);
    }
    slot.private = private;
    Ok(())
}

fn resolve_enum(chain: &mut Chain, id: EnumId) -> ChainResult<()> {
    let node = chain.enumeration(id);
    let Some(hop) = hop_for(chain, node.version, node.deprecated) else {
        return Ok(());
    };
    let target = target_local_name(chain, node.parent, &node.name, node.delegate.as_deref(), hop);
    let found = chain
        .find_enum(hop.version(), &target)
        .ok_or_else(|| ChainError::EnumNotFound {
            enumeration: node.full_name.clone(),
            package: chain.version(hop.version()).package.clone(),
            target: target.clone(),
        })?;
    let private = match hop {
        Hop::Private(_) => Some(found),
        Hop::Next(_) => chain.enumeration(found).private,
    };
    let values = node.values.clone();
    let slot = chain.enum_mut(id);
    if let Hop::Next(_) = hop {
        slot.next = Some(found);
    }
    slot.private = private;

    for value in values {
        let value_node = chain.value(value);
        let bypass = value_node.deprecated || matches!(hop, Hop::Private(_));
        let Some(target_enum) = (if bypass { private } else { Some(found) }) else {
            continue;
        };
        let target_name = value_node.delegate.as_deref().unwrap_or(&value_node.name);
        let resolved = chain.find_value(target_enum, target_name).ok_or_else(|| {
            ChainError::EnumValueNotFound {
                value: format!("{}.{}", chain.enumeration(id).full_name, value_node.name),
                package: chain.enum_package(target_enum).to_owned(),
                target: target_name.to_owned(),
            }
        })?;
        let value_private = if bypass {
            Some(resolved)
        } else {
            chain.value(resolved).private
        };
        let value_slot = chain.value_mut(value);
        if !bypass {
            value_slot.next = Some(resolved);
        }
        value_slot.private = value_private;
    }
    Ok(())
}

/// Message a member of `message` resolves into.
fn member_target(chain: &Chain, message: MessageId, bypass: bool) -> Option<MessageId> {
    let node = chain.message(message);
    if bypass { node.private } else { node.next.or(node.private) }
}

fn resolve_oneofs(chain: &mut Chain, message: MessageId) -> ChainResult<()> {
    let oneofs = chain.message(message).oneofs.clone();
    for id in oneofs {
        let node = chain.oneof(id);
        let Some(target_message) = member_target(chain, message, node.deprecated) else {
            continue;
        };
        let target = node.delegate.as_deref().unwrap_or(&node.name);
        let found = chain.find_oneof(target_message, target).ok_or_else(|| {
            ChainError::OneofNotFound {
                oneof: format!("{}.{}", chain.message(message).full_name, node.name),
                package: chain.message_package(target_message).to_owned(),
                target: target.to_owned(),
            }
        })?;
        let to_private = chain.message(target_message).version == private_of(chain, message);
        let private = if to_private {
            Some(found)
        } else {
            chain.oneof(found).private
        };
        let slot = chain.oneof_mut(id);
        if !to_private {
            slot.next = Some(found);
        }
        slot.private = private;
    }
    Ok(())
}

fn private_of(chain: &Chain, message: MessageId) -> VersionId {
    let version = chain.version(chain.message(message).version);
    version.private.unwrap_or(version.id)
}

fn resolve_fields(chain: &mut Chain, message: MessageId) -> ChainResult<()> {
    let fields = chain.message(message).fields.clone();
    let mut claimed: HashMap<FieldId, FieldId> = HashMap::new();
    for id in fields {
        let node = chain.field(id);
        let Some(found) = resolve_field_target(chain, message, id)? else {
            continue;
        };
        let to_private =
            chain.message(chain.field(found).message).version == private_of(chain, message);
        if node.oneof.is_none() && !node.deprecated {
            if let Some(first) = claimed.insert(found, id) {
                return Err(ChainError::AmbiguousDelegate {
                    first: chain.field_path(first),
                    second: chain.field_path(id),
                    target: chain.field_path(found),
                });
            }
        }
        let private = if to_private {
            Some(found)
        } else {
            chain.field(found).private
        };
        let slot = chain.field_mut(id);
        if !to_private {
            slot.next = Some(found);
        }
        slot.private = private;
    }
    Ok(())
}

/// Plain fields resolve inside the message's counterpart; oneof variants
/// resolve inside the counterpart of their already resolved oneof.
fn resolve_field_target(
    chain: &Chain,
    message: MessageId,
    id: FieldId,
) -> ChainResult<Option<FieldId>> {
    let node = chain.field(id);
    let target = node.delegate.as_deref().unwrap_or(&node.name);
    let not_found = |package: &str| ChainError::FieldNotFound {
        field: chain.field_path(id),
        package: package.to_owned(),
        target: target.to_owned(),
    };
    match node.oneof {
        None => {
            let Some(target_message) = member_target(chain, message, node.deprecated) else {
                return Ok(None);
            };
            chain
                .find_field(target_message, target)
                .map(Some)
                .ok_or_else(|| not_found(chain.message_package(target_message)))
        }
        Some(oneof) => {
            let oneof_node = chain.oneof(oneof);
            let target_oneof = if node.deprecated && !oneof_node.deprecated {
                oneof_node.private
            } else {
                oneof_node.next.or(oneof_node.private)
            };
            let Some(target_oneof) = target_oneof else {
                return Ok(None);
            };
            let owner = chain.oneof(target_oneof).message;
            chain
                .oneof(target_oneof)
                .fields
                .iter()
                .copied()
                .find(|candidate| chain.field(*candidate).name == target)
                .map(Some)
                .ok_or_else(|| not_found(chain.message_package(owner)))
        }
    }
}

fn resolve_method(chain: &mut Chain, id: MethodId) -> ChainResult<()> {
    let node = chain.method(id);
    let Some(hop) = hop_for(chain, node.version, node.deprecated) else {
        return Ok(());
    };
    let target = node.delegate.as_deref().unwrap_or(&node.name);
    let found = chain
        .find_method(hop.version(), target)
        .ok_or_else(|| ChainError::MethodNotFound {
            method: format!("{}.{}", chain.version(node.version).package, node.name),
            package: chain.version(hop.version()).package.clone(),
            target: target.to_owned(),
        })?;
    let private = match hop {
        Hop::Private(_) => Some(found),
        Hop::Next(_) => chain.method(found).private,
    };
    let slot = chain.method_mut(id);
    if let Hop::Next(_) = hop {
        slot.next = Some(found);
    }
    slot.private = private;
    Ok(())
}
