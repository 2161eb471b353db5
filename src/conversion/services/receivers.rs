//! Enum value receiver resolution.
//!
//! Up conversion of an enum folds every source value onto at most one
//! public value. Each public value claims its canonical delegate, then
//! whatever its receive directives name. Two canonical claims on the same
//! source value are the lossy Down case read backwards; the first declared
//! public value keeps it. An explicit claim on a value someone else already
//! holds is rejected.

use std::collections::HashMap;

use crate::chain::{Chain, EnumId, EnumValueId};
use crate::conversion::{
    domain::{Claim, Receive, ReceiveTable},
    error::{ConversionError, ConversionResult},
};

/// Builds the Up table from `source` values into `public` values.
///
/// `source` is the public enum's next counterpart, or its private one when
/// the Up converter reads the private record.
///
/// # Errors
///
/// Returns [`ConversionError::ReceiveValueNotFound`] when a receive
/// directive names no value of `source`, and
/// [`ConversionError::ReceiveConflict`] when a source value is claimed
/// explicitly by one public value and by any claim of another.
pub fn resolve_receivers(
    chain: &Chain,
    public: EnumId,
    source: EnumId,
) -> ConversionResult<ReceiveTable> {
    let source_private = chain.version(chain.enumeration(source).version).is_private;
    let public_values = &chain.enumeration(public).values;
    let mut owner: HashMap<EnumValueId, (EnumValueId, Claim)> = HashMap::new();
    let mut claims: Vec<(EnumValueId, EnumValueId, Claim)> = Vec::new();

    for id in public_values {
        let value = chain.value(*id);
        let canonical = if source_private { value.private } else { value.next };
        let Some(delegate) = canonical.filter(|c| chain.value(*c).enumeration == source) else {
            continue;
        };
        if let Some((first, _)) = owner.get(&delegate) {
            tracing::debug!(
                source = %value_path(chain, delegate),
                kept = %value_path(chain, *first),
                dropped = %value_path(chain, *id),
                "canonical delegate shared; first declared value receives it"
            );
            continue;
        }
        owner.insert(delegate, (*id, Claim::Canonical));
        claims.push((*id, delegate, Claim::Canonical));
    }

    for id in public_values {
        for name in &chain.value(*id).receive {
            let received = chain.find_value(source, name).ok_or_else(|| {
                ConversionError::ReceiveValueNotFound {
                    value: value_path(chain, *id),
                    enumeration: chain.enumeration(source).full_name.clone(),
                    target: name.clone(),
                }
            })?;
            match owner.get(&received) {
                Some((holder, _)) if holder == id => continue,
                Some((holder, _)) => {
                    return Err(ConversionError::ReceiveConflict {
                        source_value: value_path(chain, received),
                        first: value_path(chain, *holder),
                        second: value_path(chain, *id),
                    });
                }
                None => {}
            }
            owner.insert(received, (*id, Claim::Explicit));
            claims.push((*id, received, Claim::Explicit));
        }
    }

    let entries = public_values
        .iter()
        .flat_map(|id| {
            claims
                .iter()
                .filter(move |(holder, _, _)| holder == id)
                .map(|(holder, received, claim)| Receive {
                    source: *received,
                    source_name: chain.value(*received).name.clone(),
                    public: *holder,
                    public_name: chain.value(*holder).name.clone(),
                    claim: *claim,
                })
        })
        .collect();
    Ok(ReceiveTable {
        public,
        source,
        entries,
    })
}

fn value_path(chain: &Chain, value: EnumValueId) -> String {
    let node = chain.value(value);
    format!("{}.{}", chain.enumeration(node.enumeration).full_name, node.name)
}
