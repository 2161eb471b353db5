//! Match classification of corresponding fields.
//!
//! Only identical scalar kinds are trivially matched. Enum and message
//! fields always route through a converter, even when both sides look
//! alike, because their value sets and shapes drift between releases.

use crate::chain::domain::{Chain, ConvertKind, Field, FieldId, Propagation, TypeRef};
use crate::descriptor::FieldKind;

/// Classifies how a value of `source` reaches `target`.
#[must_use]
pub fn classify_pair(source: &Field, target: &Field) -> Propagation {
    if source.repeated != target.repeated {
        return Propagation::Unconvertible;
    }
    match (source.kind, target.kind) {
        (FieldKind::Scalar(a), FieldKind::Scalar(b)) if a == b => Propagation::Copy,
        (FieldKind::Enum, FieldKind::Enum) => Propagation::Convert(ConvertKind::Enum),
        (FieldKind::Message, FieldKind::Message) => {
            match (&source.type_ref, &target.type_ref) {
                (Some(TypeRef::Message(_)), Some(TypeRef::Message(_))) => {
                    Propagation::Convert(ConvertKind::Message)
                }
                (Some(TypeRef::External(a)), Some(TypeRef::External(b))) if a == b => {
                    Propagation::Shared
                }
                _ => Propagation::Unconvertible,
            }
        }
        _ => Propagation::Unconvertible,
    }
}

/// Stores the classification of every public field against its hop
/// counterpart.
pub fn classify(chain: &mut Chain) {
    let pairs: Vec<(FieldId, Propagation)> = chain
        .fields
        .iter()
        .filter_map(|field| {
            let counterpart = chain.field(field.counterpart()?);
            Some((field.id, classify_pair(field, counterpart)))
        })
        .collect();
    for (id, propagation) in pairs {
        if propagation == Propagation::Unconvertible {
            tracing::warn!(
                field = %chain.field_path(id),
                "field kinds differ across hop; leaving it to a converter override"
            );
        }
        chain.field_mut(id).propagation = propagation;
    }
}
