//! Document consistency checks.
//!
//! Verifies the uniqueness invariants a merged document is expected to hold:
//! operation identifiers are unique across all paths and methods, and tag
//! names are unique. The merge never calls this itself; it is meant for
//! build scripts and tests that want to confirm a merge result.
//!
//! # Examples
//!
//! ```
//! use openapi_mixin_core::*;
//!
//! let doc = Document::default()
//!     .with_path("/a", PathItem::new().with_operation(Method::Get, Operation::new("op")))
//!     .with_path("/b", PathItem::new().with_operation(Method::Get, Operation::new("op")));
//!
//! let errors = check_document(&doc);
//! assert_eq!(errors.len(), 1);
//! assert!(matches!(errors[0], ConsistencyError::DuplicateOperationId { .. }));
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::{Document, Method};

/// A violated uniqueness invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    /// Two operations share an `operationId`.
    #[error("duplicate operationId '{operation_id}' at {method} {path} (first used at {first})")]
    DuplicateOperationId {
        operation_id: String,
        method: Method,
        path: String,
        first: String,
    },
    /// Two top-level tags share a name.
    #[error("duplicate tag name: {0}")]
    DuplicateTag(String),
}

/// Checks a document for duplicate operation identifiers and tag names.
///
/// Every violation is reported, in document order.
pub fn check_document(document: &Document) -> Vec<ConsistencyError> {
    let mut errors = Vec::new();

    let mut seen_ops: HashMap<&str, String> = HashMap::new();
    for (path, item) in document.paths.iter().flatten() {
        for (method, op) in item.operations() {
            let Some(id) = op.operation_id.as_deref() else {
                continue;
            };
            match seen_ops.get(id) {
                Some(first) => errors.push(ConsistencyError::DuplicateOperationId {
                    operation_id: id.to_string(),
                    method,
                    path: path.clone(),
                    first: first.clone(),
                }),
                None => {
                    seen_ops.insert(id, format!("{method} {path}"));
                }
            }
        }
    }

    let mut seen_tags: HashSet<&str> = HashSet::new();
    for tag in document.tags.iter().flatten() {
        if !seen_tags.insert(tag.name.as_str()) {
            errors.push(ConsistencyError::DuplicateTag(tag.name.clone()));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::{Operation, PathItem, Tag};

    use super::*;

    #[test]
    fn test_clean_document_has_no_errors() {
        let doc = Document::default()
            .with_path(
                "/pets",
                PathItem::new()
                    .with_operation(Method::Get, Operation::new("listPets"))
                    .with_operation(Method::Post, Operation::new("createPet")),
            )
            .with_tag(Tag::new("pets"));
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn test_duplicate_operation_id_names_both_sites() {
        let doc = Document::default()
            .with_path("/a", PathItem::new().with_operation(Method::Get, Operation::new("op")))
            .with_path("/b", PathItem::new().with_operation(Method::Put, Operation::new("op")));

        let errors = check_document(&doc);
        assert_eq!(
            errors,
            vec![ConsistencyError::DuplicateOperationId {
                operation_id: "op".into(),
                method: Method::Put,
                path: "/b".into(),
                first: "GET /a".into(),
            }]
        );
        assert_eq!(
            errors[0].to_string(),
            "duplicate operationId 'op' at PUT /b (first used at GET /a)"
        );
    }

    #[test]
    fn test_operations_without_id_are_ignored() {
        let doc = Document::default()
            .with_path("/a", PathItem::new().with_operation(Method::Get, Operation::default()))
            .with_path("/b", PathItem::new().with_operation(Method::Get, Operation::default()));
        assert!(check_document(&doc).is_empty());
    }

    #[test]
    fn test_duplicate_tag() {
        let doc = Document::default()
            .with_tag(Tag::new("pets"))
            .with_tag(Tag::new("pets").with_description("again"));
        assert_eq!(
            check_document(&doc),
            vec![ConsistencyError::DuplicateTag("pets".into())]
        );
    }
}
