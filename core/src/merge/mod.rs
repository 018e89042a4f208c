//! Priority-ordered merging of mixin documents into a primary document.
//!
//! [`mixin`] folds any number of secondary documents into a primary one.
//! Entries already present in the primary always win; among mixins, the one
//! listed first wins. Every entry that loses a collision is reported as a
//! [`Skipped`] diagnostic instead of being merged.
//!
//! Operation identifiers are the exception: an incoming operation whose
//! `operationId` is already taken is still merged, with `Mixin<N>` appended
//! to its identifier (`N` being the zero-based mixin position).
//!
//! # Example
//!
//! ```
//! use openapi_mixin_core::*;
//!
//! let mut primary = Document::new("3.0.3")
//!     .with_path("/pets", PathItem::new().with_operation(Method::Get, Operation::new("listPets")));
//!
//! let fragment = Document::new("3.0.3")
//!     .with_path("/pets", PathItem::new().with_operation(Method::Get, Operation::new("listPets2")))
//!     .with_path("/owners", PathItem::new().with_operation(Method::Get, Operation::new("listPets")));
//!
//! let skipped = mixin(&mut primary, &[fragment]);
//!
//! assert_eq!(skipped.len(), 1);
//! assert_eq!(skipped[0].category, SkipCategory::Path);
//! let owners = primary.path("/owners").unwrap();
//! assert_eq!(
//!     owners.get.as_ref().unwrap().operation_id.as_deref(),
//!     Some("listPetsMixin0"),
//! );
//! ```

mod components;
mod metadata;
mod paths;
mod security;
mod tags;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::{Components, Document, Skipped};

pub use paths::{MIXIN_MARKER, operation_ids};

/// Merges `mixins` into `primary` in priority order and returns every skipped
/// entry.
///
/// The primary is mutated in place; mixins are only read, and every entry
/// taken from a mixin is copied. Categories are merged per mixin in a fixed
/// order: metadata and extensions, tags, security schemes, security
/// requirements, schemas, paths, parameters, responses. Diagnostics are
/// returned in that same mixin-major, category-minor order, and within a
/// category in the mixin's source order.
///
/// Merging cannot fail: collisions are reported, and categories a mixin does
/// not define are no-ops.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::*;
///
/// let mut primary = Document::default();
/// let first = Document::default().with_info(Info::new("A", "1.0"));
/// let second = Document::default().with_info(Info::new("B", "2.0"));
///
/// let skipped = mixin(&mut primary, &[first, second]);
/// assert!(skipped.is_empty());
/// assert_eq!(primary.info.unwrap().title.as_deref(), Some("A"));
/// ```
pub fn mixin(primary: &mut Document, mixins: &[Document]) -> Vec<Skipped> {
    let mut skipped = Vec::with_capacity(mixins.len());
    let mut op_ids = operation_ids(primary);
    let declares_paths = primary.paths.is_some();
    normalize(primary);

    for (index, source) in mixins.iter().enumerate() {
        let before = skipped.len();

        skipped.extend(metadata::merge_document_props(primary, source, index));
        skipped.extend(tags::merge_tags(primary, source, index));
        skipped.extend(components::merge_security_schemes(primary, source, index));
        skipped.extend(security::merge_security_requirements(primary, source, index));
        skipped.extend(components::merge_schemas(primary, source, index));
        skipped.extend(paths::merge_paths(primary, source, &mut op_ids, index));
        skipped.extend(components::merge_parameters(primary, source, index));
        skipped.extend(components::merge_responses(primary, source, index));

        debug!(
            mixin = index,
            skipped = skipped.len() - before,
            "merged mixin document"
        );
    }

    if !declares_paths && primary.paths.as_ref().is_some_and(IndexMap::is_empty) {
        primary.paths = None;
    }

    info!(
        mixins = mixins.len(),
        skipped = skipped.len(),
        "mixin merge complete"
    );
    skipped
}

/// Materialises every collection the merge writes into.
///
/// Existing values are never touched. Empty collections are omitted on
/// serialization, except `paths`, which OpenAPI requires and which is
/// written whenever it is present. [`mixin`] removes a `paths` object it
/// materialised here if no mixin added a path to it.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::{Document, normalize};
///
/// let mut doc = Document::default();
/// normalize(&mut doc);
/// assert!(doc.paths.is_some());
/// assert!(doc.components.as_ref().unwrap().schemas.is_some());
/// assert_eq!(serde_json::to_string(&doc).unwrap(), r#"{"paths":{}}"#);
/// ```
pub fn normalize(document: &mut Document) {
    let components = document.components.get_or_insert_with(Components::default);
    components.schemas.get_or_insert_with(IndexMap::new);
    components.parameters.get_or_insert_with(IndexMap::new);
    components.responses.get_or_insert_with(IndexMap::new);
    components.security_schemes.get_or_insert_with(IndexMap::new);

    document.tags.get_or_insert_with(Vec::new);
    document.security.get_or_insert_with(Vec::new);
    document.paths.get_or_insert_with(IndexMap::new);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        ExtensionScope, Info, Method, Operation, PathItem, SecurityRequirement, SkipCategory, Tag,
        check_document,
    };

    use super::*;

    fn get(id: &str) -> PathItem {
        PathItem::new().with_operation(Method::Get, Operation::new(id))
    }

    fn op_id<'a>(doc: &'a Document, path: &str, method: Method) -> Option<&'a str> {
        doc.path(path)?.operation(method)?.operation_id.as_deref()
    }

    fn requirement(scheme: &str, scopes: &[&str]) -> SecurityRequirement {
        let mut req = SecurityRequirement::new();
        req.insert(scheme.into(), scopes.iter().map(|s| s.to_string()).collect());
        req
    }

    fn sample_primary() -> Document {
        Document::new("3.0.3")
            .with_info(Info::new("Pets", "1.0"))
            .with_path("/pets", get("listPets"))
            .with_schema("Pet", json!({"type": "object"}))
            .with_parameter("limit", json!({"name": "limit", "in": "query"}))
            .with_response("NotFound", json!({"description": "not found"}))
            .with_security_scheme("api_key", json!({"type": "apiKey"}))
            .with_tag(Tag::new("pets"))
            .with_security(requirement("api_key", &[]))
            .with_extension("x-team", json!("core"))
    }

    #[test]
    fn test_no_mixins_leaves_primary_unchanged() {
        let mut primary = sample_primary();
        let before = serde_json::to_value(&primary).unwrap();

        let skipped = mixin(&mut primary, &[]);

        assert!(skipped.is_empty());
        assert_eq!(serde_json::to_value(&primary).unwrap(), before);
    }

    #[test]
    fn test_normalize_is_additive() {
        let mut doc = sample_primary();
        doc.paths = None;
        normalize(&mut doc);

        assert!(doc.paths.as_ref().unwrap().is_empty());
        assert!(doc.schema("Pet").is_some());
        assert_eq!(doc.tags.as_ref().unwrap().len(), 1);
        assert_eq!(doc.security.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_paths_presence_survives_merge() {
        let mut primary: Document =
            serde_json::from_value(json!({"openapi": "3.0.3", "paths": {}})).unwrap();
        let fragment = Document::new("3.0.3").with_schema("Owner", json!({"type": "object"}));

        mixin(&mut primary, &[fragment.clone()]);
        assert_eq!(serde_json::to_value(&primary).unwrap()["paths"], json!({}));

        let mut bare = Document::new("3.0.3");
        mixin(&mut bare, &[fragment]);
        assert!(serde_json::to_value(&bare).unwrap().get("paths").is_none());

        let mut bare = Document::new("3.0.3");
        mixin(&mut bare, &[Document::new("3.0.3").with_path("/owners", get("listOwners"))]);
        assert_eq!(op_id(&bare, "/owners", Method::Get), Some("listOwners"));
    }

    #[test]
    fn test_path_collision_and_operation_rename() {
        let mut primary = Document::new("3.0.3").with_path("/pets", get("listPets"));
        let fragment = Document::new("3.0.3")
            .with_path("/pets", get("listPets2"))
            .with_path("/owners", get("listPets"));

        let skipped = mixin(&mut primary, &[fragment]);

        assert_eq!(skipped, vec![Skipped::new(0, SkipCategory::Path, "/pets")]);
        assert_eq!(op_id(&primary, "/pets", Method::Get), Some("listPets"));
        assert_eq!(op_id(&primary, "/owners", Method::Get), Some("listPetsMixin0"));
    }

    #[test]
    fn test_first_populated_info_field_wins_without_diagnostic() {
        let mut primary = Document::new("3.0.3").with_info(Info::default());
        let a = Document::default().with_info(Info {
            title: Some("A".into()),
            ..Default::default()
        });
        let b = Document::default().with_info(Info {
            title: Some("B".into()),
            ..Default::default()
        });

        let skipped = mixin(&mut primary, &[a, b]);

        assert!(skipped.is_empty());
        assert_eq!(primary.info.unwrap().title.as_deref(), Some("A"));
    }

    #[test]
    fn test_earlier_mixin_wins_over_later() {
        let mut primary = Document::new("3.0.3");
        let a = Document::default().with_schema("Owner", json!({"title": "from a"}));
        let b = Document::default().with_schema("Owner", json!({"title": "from b"}));

        let skipped = mixin(&mut primary, &[a, b]);

        assert_eq!(skipped, vec![Skipped::new(1, SkipCategory::Schema, "Owner")]);
        assert_eq!(primary.schema("Owner"), Some(&json!({"title": "from a"})));
    }

    #[test]
    fn test_primary_entries_win_regardless_of_order() {
        let base = sample_primary();
        let a = Document::default().with_schema("Pet", json!({"title": "a"}));
        let b = Document::default().with_schema("Pet", json!({"title": "b"}));

        for mixins in [[a.clone(), b.clone()], [b, a]] {
            let mut primary = base.clone();
            let skipped = mixin(&mut primary, &mixins);
            assert_eq!(skipped.len(), 2);
            assert_eq!(primary.schema("Pet"), Some(&json!({"type": "object"})));
        }
    }

    #[test]
    fn test_subset_mixin_changes_nothing_and_reports_everything() {
        let mut primary = sample_primary();
        let subset = sample_primary();
        let before = serde_json::to_value(&primary).unwrap();

        let skipped = mixin(&mut primary, &[subset]);

        assert_eq!(serde_json::to_value(&primary).unwrap(), before);
        let categories: Vec<_> = skipped.iter().map(|s| s.category).collect();
        assert_eq!(
            categories,
            vec![
                SkipCategory::Extension(ExtensionScope::Root),
                SkipCategory::Tag,
                SkipCategory::SecurityScheme,
                SkipCategory::SecurityRequirement,
                SkipCategory::Schema,
                SkipCategory::Path,
                SkipCategory::Parameter,
                SkipCategory::Response,
            ]
        );
    }

    #[test]
    fn test_diagnostics_are_mixin_major() {
        let mut primary = sample_primary();
        let a = Document::default()
            .with_response("NotFound", json!({}))
            .with_tag(Tag::new("pets"));
        let b = Document::default().with_schema("Pet", json!({}));

        let skipped = mixin(&mut primary, &[a, b]);

        let order: Vec<_> = skipped.iter().map(|s| (s.mixin, s.category)).collect();
        assert_eq!(
            order,
            vec![
                (0, SkipCategory::Tag),
                (0, SkipCategory::Response),
                (1, SkipCategory::Schema),
            ]
        );
    }

    #[test]
    fn test_operation_ids_unique_across_many_mixins() {
        let mut primary = Document::new("3.0.3").with_path("/a", get("op"));
        let mixins: Vec<Document> = (0..4)
            .map(|i| {
                Document::default()
                    .with_path(format!("/m{i}/one"), get("op"))
                    .with_path(format!("/m{i}/two"), get("op"))
            })
            .collect();

        let skipped = mixin(&mut primary, &mixins);

        assert!(skipped.is_empty());
        assert!(check_document(&primary).is_empty());
        assert_eq!(op_id(&primary, "/m0/one", Method::Get), Some("opMixin0"));
        assert_eq!(op_id(&primary, "/m0/two", Method::Get), Some("opMixin0Mixin0"));
        assert_eq!(op_id(&primary, "/m3/one", Method::Get), Some("opMixin3"));
    }

    #[test]
    fn test_renames_are_reproducible() {
        let build = || {
            let mut primary = Document::new("3.0.3").with_path("/a", get("op"));
            let fragment = Document::default()
                .with_path("/b", get("op"))
                .with_path("/c", get("op"));
            let skipped = mixin(&mut primary, &[Document::default(), fragment]);
            (serde_json::to_string(&primary).unwrap(), skipped)
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_mixins_are_not_mutated() {
        let mut primary = Document::new("3.0.3").with_path("/a", get("op"));
        let fragment = Document::default().with_path("/b", get("op"));
        let snapshot = fragment.clone();

        mixin(&mut primary, std::slice::from_ref(&fragment));

        assert_eq!(fragment, snapshot);
        assert_eq!(op_id(&fragment, "/b", Method::Get), Some("op"));
    }
}
