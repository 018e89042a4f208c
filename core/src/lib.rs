//! Document model and merge engine for composing OpenAPI documents.
//!
//! This crate merges several partial API documents ("mixins") into one
//! primary document:
//!
//! - [`Document`]: the in-memory document tree. Merged collections are
//!   typed; everything else is opaque JSON and round-trips untouched.
//! - [`mixin`]: folds mixins into the primary in priority order and returns
//!   a [`Skipped`] diagnostic for every entry that lost a collision.
//! - [`operation_ids`] and [`normalize`]: the two preparation steps the merge
//!   runs on the primary, exposed for callers that need them separately.
//! - [`check_document`]: confirms a document holds the uniqueness
//!   invariants (operation identifiers, tag names) a merge guarantees.
//!
//! The crate does no file or text I/O; see the `openapi-mixin-loader` crate
//! for reading and writing documents.
//!
//! # Example
//!
//! ```
//! use openapi_mixin_core::*;
//! use serde_json::json;
//!
//! let mut primary = Document::new("3.0.3")
//!     .with_info(Info::new("Pet store", "1.0.0"))
//!     .with_schema("Pet", json!({"type": "object"}));
//!
//! let orders = Document::new("3.0.3")
//!     .with_path("/orders", PathItem::new().with_operation(Method::Get, Operation::new("listOrders")))
//!     .with_schema("Pet", json!({"type": "object"}))
//!     .with_schema("Order", json!({"type": "object"}));
//!
//! let skipped = mixin(&mut primary, &[orders]);
//!
//! assert_eq!(skipped.len(), 1);
//! assert_eq!(skipped[0].category, SkipCategory::Schema);
//! assert!(primary.schema("Order").is_some());
//! assert!(primary.path("/orders").is_some());
//! assert!(check_document(&primary).is_empty());
//! ```

mod merge;
mod report;
mod types;
mod validate;

pub use merge::{MIXIN_MARKER, mixin, normalize, operation_ids};
pub use report::{ExtensionScope, SkipCategory, Skipped};
pub use types::*;
pub use validate::{ConsistencyError, check_document};
