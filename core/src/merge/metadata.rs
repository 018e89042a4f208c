//! Top-level metadata merging: `info`, `externalDocs` and extension maps.
//!
//! Scalar fields are filled, never overwritten: a mixin only supplies a
//! value the primary (or an earlier mixin) left absent or empty. Filling is
//! not a collision and is not reported. Extension maps follow the same
//! "existing key wins" rule as component sections and report collisions.

use tracing::debug;

use crate::{
    Contact, Document, ExtensionScope, Extensions, ExternalDocs, Info, License, SkipCategory,
    Skipped,
};

pub(super) fn merge_document_props(
    primary: &mut Document,
    mixin: &Document,
    index: usize,
) -> Vec<Skipped> {
    let mut skipped = merge_extensions(
        &mut primary.extensions,
        &mixin.extensions,
        ExtensionScope::Root,
        index,
    );

    if let Some(source) = mixin.info.as_ref() {
        match primary.info.as_mut() {
            Some(target) => skipped.extend(merge_info(target, source, index)),
            None => primary.info = Some(source.clone()),
        }
    }

    if let Some(source) = mixin.external_docs.as_ref() {
        match primary.external_docs.as_mut() {
            Some(target) => merge_external_docs(target, source),
            None => primary.external_docs = Some(source.clone()),
        }
    }

    skipped
}

fn merge_info(target: &mut Info, source: &Info, index: usize) -> Vec<Skipped> {
    let mut skipped = merge_extensions(
        &mut target.extensions,
        &source.extensions,
        ExtensionScope::Info,
        index,
    );

    fill(&mut target.title, &source.title);
    fill(&mut target.description, &source.description);
    fill(&mut target.terms_of_service, &source.terms_of_service);
    fill(&mut target.version, &source.version);

    if let Some(source) = source.contact.as_ref() {
        match target.contact.as_mut() {
            Some(contact) => skipped.extend(merge_contact(contact, source, index)),
            None => target.contact = Some(source.clone()),
        }
    }

    if let Some(source) = source.license.as_ref() {
        match target.license.as_mut() {
            Some(license) => skipped.extend(merge_license(license, source, index)),
            None => target.license = Some(source.clone()),
        }
    }

    skipped
}

fn merge_contact(target: &mut Contact, source: &Contact, index: usize) -> Vec<Skipped> {
    fill(&mut target.name, &source.name);
    fill(&mut target.url, &source.url);
    fill(&mut target.email, &source.email);
    merge_extensions(
        &mut target.extensions,
        &source.extensions,
        ExtensionScope::Contact,
        index,
    )
}

fn merge_license(target: &mut License, source: &License, index: usize) -> Vec<Skipped> {
    fill(&mut target.name, &source.name);
    fill(&mut target.url, &source.url);
    merge_extensions(
        &mut target.extensions,
        &source.extensions,
        ExtensionScope::License,
        index,
    )
}

fn merge_external_docs(target: &mut ExternalDocs, source: &ExternalDocs) {
    fill(&mut target.description, &source.description);
    fill(&mut target.url, &source.url);
}

fn merge_extensions(
    target: &mut Extensions,
    source: &Extensions,
    scope: ExtensionScope,
    index: usize,
) -> Vec<Skipped> {
    let mut skipped = Vec::new();
    for (key, value) in source {
        if target.contains_key(key) {
            debug!(mixin = index, scope = scope.as_str(), key = %key, "extension already defined");
            skipped.push(Skipped::new(index, SkipCategory::Extension(scope), key.as_str()));
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
    skipped
}

/// Copies `source` into `target` when `target` is absent or empty.
fn fill(target: &mut Option<String>, source: &Option<String>) {
    if !target.as_deref().is_none_or(str::is_empty) {
        return;
    }
    if let Some(value) = source.as_deref().filter(|v| !v.is_empty()) {
        *target = Some(value.to_string());
    }
}
