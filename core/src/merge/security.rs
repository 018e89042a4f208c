//! Global security requirement merging.
//!
//! Requirements have no natural key, so an incoming requirement is compared
//! structurally against every requirement already in the primary.

use tracing::debug;

use crate::{Document, SecurityRequirement, SkipCategory, Skipped};

pub(super) fn merge_security_requirements(
    primary: &mut Document,
    mixin: &Document,
    index: usize,
) -> Vec<Skipped> {
    let Some(source) = mixin.security.as_ref() else {
        return Vec::new();
    };

    let target = primary.security.get_or_insert_with(Vec::new);
    let mut skipped = Vec::new();

    for requirement in source {
        if target.contains(requirement) {
            let rendered = render(requirement);
            debug!(mixin = index, requirement = %rendered, "security requirement already present");
            skipped.push(Skipped::new(
                index,
                SkipCategory::SecurityRequirement,
                rendered,
            ));
            continue;
        }
        target.push(requirement.clone());
    }

    skipped
}

/// Renders a requirement as `scheme: [scope, ...]` pairs.
fn render(requirement: &SecurityRequirement) -> String {
    requirement
        .iter()
        .map(|(scheme, scopes)| format!("{scheme}: [{}]", scopes.join(", ")))
        .collect::<Vec<_>>()
        .join(", ")
}
