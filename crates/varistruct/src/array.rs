//! Terminated arrays of fixed-length structs.
//!
//! Containers store a variable number of structs back to back, usually
//! followed by a fixed terminator such as `FF FF`. Item count is implied by
//! the buffer length.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    descriptor::StructDescriptor,
    errors::{Error, Result},
    instance::StructInstance,
    variant::Variant,
};

/// What to do when an array does not end with its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminatorPolicy {
    /// Fail with [`Error::MissingTerminator`].
    #[default]
    Required,
    /// Treat the whole buffer as items.
    Optional,
}

/// Splits `data` into instances of `descriptor`.
///
/// A non-empty `terminator` is stripped from the end first. Leftover bytes
/// that do not make up a whole item are an error, never silently dropped.
pub fn load_array<V: Variant>(
    descriptor: &Arc<StructDescriptor<V>>,
    variant: V,
    data: &[u8],
    terminator: &[u8],
    policy: TerminatorPolicy,
) -> Result<Vec<StructInstance<V>>> {
    let body = match data.strip_suffix(terminator) {
        Some(body) => body,
        None => match policy {
            TerminatorPolicy::Required => {
                return Err(Error::MissingTerminator {
                    structure: descriptor.name().to_owned(),
                    terminator: terminator.to_vec(),
                });
            }
            TerminatorPolicy::Optional => {
                warn!(
                    structure = descriptor.name(),
                    variant = variant.name(),
                    "array has no terminator, reading the whole buffer"
                );
                data
            }
        },
    };

    let item_length = descriptor.length(variant)?;
    if item_length == 0 {
        return if body.is_empty() {
            Ok(Vec::new())
        } else {
            Err(Error::TruncatedArray {
                structure: descriptor.name().to_owned(),
                item_length,
                remainder: body.len(),
            })
        };
    }

    let remainder = body.len() % item_length;
    if remainder != 0 {
        return Err(Error::TruncatedArray {
            structure: descriptor.name().to_owned(),
            item_length,
            remainder,
        });
    }

    body.chunks_exact(item_length)
        .map(|chunk| StructInstance::load(Arc::clone(descriptor), variant, chunk))
        .collect()
}

/// Concatenates every item's bytes and appends `terminator`.
pub fn save_array<V: Variant>(items: &[StructInstance<V>], terminator: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(items.iter().map(|i| i.as_bytes().len()).sum::<usize>() + terminator.len());
    for item in items {
        out.extend_from_slice(item.as_bytes());
    }
    out.extend_from_slice(terminator);
    out
}

/// Loads a block framed by the descriptor's own terminator for `variant`.
pub fn load_block<V: Variant>(
    descriptor: &Arc<StructDescriptor<V>>,
    variant: V,
    data: &[u8],
) -> Result<Vec<StructInstance<V>>> {
    let terminator = descriptor.block_terminator(variant)?;
    let items = load_array(descriptor, variant, data, terminator, TerminatorPolicy::Required)?;

    debug!(
        structure = descriptor.name(),
        variant = variant.name(),
        count = items.len(),
        "loaded block"
    );
    Ok(items)
}

/// Saves a block framed by the descriptor's own terminator for `variant`.
/// Every item must be an instance of `descriptor` in `variant`.
pub fn save_block<V: Variant>(
    descriptor: &Arc<StructDescriptor<V>>,
    variant: V,
    items: &[StructInstance<V>],
) -> Result<Vec<u8>> {
    let foreign = items
        .iter()
        .find(|item| item.variant() != variant || !Arc::ptr_eq(item.descriptor(), descriptor));
    if let Some(item) = foreign {
        return Err(Error::ForeignItem {
            structure: descriptor.name().to_owned(),
            variant: variant.name(),
            item_structure: item.descriptor().name().to_owned(),
            item_variant: item.variant().name(),
        });
    }

    let terminator = descriptor.block_terminator(variant)?;
    debug!(
        structure = descriptor.name(),
        variant = variant.name(),
        count = items.len(),
        "saving block"
    );
    Ok(save_array(items, terminator))
}
