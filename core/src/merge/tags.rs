//! Tag merging. Tags are identified by name only.

use tracing::debug;

use crate::{Document, SkipCategory, Skipped};

/// Appends the mixin's tags whose names are not yet used.
///
/// Two tags sharing a name collide even if their descriptions differ; the
/// earlier tag is kept whole.
pub(super) fn merge_tags(primary: &mut Document, mixin: &Document, index: usize) -> Vec<Skipped> {
    let Some(source) = mixin.tags.as_ref() else {
        return Vec::new();
    };

    let target = primary.tags.get_or_insert_with(Vec::new);
    let mut skipped = Vec::new();

    for tag in source {
        if target.iter().any(|existing| existing.name == tag.name) {
            debug!(mixin = index, tag = %tag.name, "tag already defined");
            skipped.push(Skipped::new(index, SkipCategory::Tag, tag.name.as_str()));
            continue;
        }
        target.push(tag.clone());
    }

    skipped
}
