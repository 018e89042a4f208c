//! Path merging and operation-identifier bookkeeping.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::{Document, SkipCategory, Skipped};

/// Literal inserted between a colliding operation identifier and the mixin
/// index when it is renamed.
pub const MIXIN_MARKER: &str = "Mixin";

/// Collects every operation identifier used in `document`.
///
/// Only the six modelled method slots are visited; operations without an
/// identifier contribute nothing. Matching is exact and case-sensitive.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::*;
///
/// let doc = Document::default()
///     .with_path("/pets", PathItem::new()
///         .with_operation(Method::Get, Operation::new("listPets"))
///         .with_operation(Method::Post, Operation::new("createPet")));
///
/// let ids = operation_ids(&doc);
/// assert!(ids.contains("listPets"));
/// assert!(ids.contains("createPet"));
/// assert!(operation_ids(&Document::default()).is_empty());
/// ```
pub fn operation_ids(document: &Document) -> HashSet<String> {
    let Some(paths) = document.paths.as_ref() else {
        return HashSet::new();
    };

    paths
        .values()
        .flat_map(|item| item.operations())
        .filter_map(|(_, op)| op.operation_id.clone())
        .collect()
}

/// Merges the mixin's path items.
///
/// A path already present in the primary is skipped whole; there is no
/// per-method merging. Operations of an accepted path whose identifier is
/// already in `op_ids` are renamed, and every accepted identifier is added
/// to `op_ids`.
pub(super) fn merge_paths(
    primary: &mut Document,
    mixin: &Document,
    op_ids: &mut HashSet<String>,
    index: usize,
) -> Vec<Skipped> {
    let Some(source) = mixin.paths.as_ref() else {
        return Vec::new();
    };

    let target = primary.paths.get_or_insert_with(IndexMap::new);
    let mut skipped = Vec::new();

    for (path, item) in source {
        if target.contains_key(path) {
            debug!(mixin = index, path = %path, "path already defined");
            skipped.push(Skipped::new(index, SkipCategory::Path, path.as_str()));
            continue;
        }

        let mut item = item.clone();
        for (method, op) in item.operations_mut() {
            let Some(id) = op.operation_id.as_mut() else {
                continue;
            };
            if op_ids.contains(id.as_str()) {
                let renamed = disambiguate(id, op_ids, index);
                debug!(
                    mixin = index,
                    path = %path,
                    method = %method,
                    from = %id,
                    to = %renamed,
                    "renamed colliding operationId"
                );
                *id = renamed;
            }
            op_ids.insert(id.clone());
        }

        target.insert(path.clone(), item);
    }

    skipped
}

/// Appends `Mixin<index>` to `id` until the result is not in `taken`.
///
/// A single append is enough unless the mixin itself repeats an identifier
/// or the primary already uses the suffixed name.
fn disambiguate(id: &str, taken: &HashSet<String>, index: usize) -> String {
    let suffix = format!("{MIXIN_MARKER}{index}");
    let mut candidate = format!("{id}{suffix}");
    while taken.contains(&candidate) {
        candidate.push_str(&suffix);
    }
    candidate
}
