//! Skip diagnostics produced while merging.
//!
//! Every entry a mixin could not contribute because its key, name or
//! identifier was already taken is reported as a [`Skipped`] value. The
//! `Display` impl renders the human-readable line build scripts print; the
//! serde impls feed machine-readable reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Object whose extension map an extension entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionScope {
    /// Document root.
    Root,
    /// The `info` object.
    Info,
    /// The `info.contact` object.
    Contact,
    /// The `info.license` object.
    License,
}

impl ExtensionScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtensionScope::Root => "root",
            ExtensionScope::Info => "info",
            ExtensionScope::Contact => "contact",
            ExtensionScope::License => "license",
        }
    }
}

/// Category of a skipped entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipCategory {
    /// Vendor extension key.
    Extension(ExtensionScope),
    /// Top-level tag (by name).
    Tag,
    /// `components.securitySchemes` entry.
    SecurityScheme,
    /// Global security requirement (by structural equality).
    SecurityRequirement,
    /// `components.schemas` entry.
    Schema,
    /// Whole path item.
    Path,
    /// `components.parameters` entry.
    Parameter,
    /// `components.responses` entry.
    Response,
}

impl fmt::Display for SkipCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipCategory::Extension(scope) => write!(f, "{} extension", scope.as_str()),
            SkipCategory::Tag => f.write_str("tag"),
            SkipCategory::SecurityScheme => f.write_str("securitySchemes"),
            SkipCategory::SecurityRequirement => f.write_str("security requirement"),
            SkipCategory::Schema => f.write_str("schemas"),
            SkipCategory::Path => f.write_str("paths"),
            SkipCategory::Parameter => f.write_str("parameters"),
            SkipCategory::Response => f.write_str("responses"),
        }
    }
}

/// One entry a mixin could not contribute.
///
/// # Examples
///
/// ```
/// use openapi_mixin_core::{SkipCategory, Skipped};
///
/// let skipped = Skipped::new(0, SkipCategory::Path, "/pets");
/// assert_eq!(
///     skipped.to_string(),
///     "paths entry '/pets' already exists in primary or higher priority mixin, skipping",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    /// Zero-based position of the mixin the entry came from.
    pub mixin: usize,
    /// Collection the entry belongs to.
    pub category: SkipCategory,
    /// Colliding key, name, or rendered requirement.
    pub key: String,
}

impl Skipped {
    pub fn new(mixin: usize, category: SkipCategory, key: impl Into<String>) -> Self {
        Self {
            mixin,
            category,
            key: key.into(),
        }
    }
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = &self.key;
        match self.category {
            SkipCategory::Extension(scope) => write!(f, "{} extension '{key}'", scope.as_str())?,
            SkipCategory::Tag => write!(f, "top level tags entry with name '{key}'")?,
            SkipCategory::SecurityScheme => write!(f, "securitySchemes entry '{key}'")?,
            SkipCategory::SecurityRequirement => write!(f, "security requirement '{key}'")?,
            SkipCategory::Schema => write!(f, "schemas entry '{key}'")?,
            SkipCategory::Path => write!(f, "paths entry '{key}'")?,
            SkipCategory::Parameter => write!(f, "components parameters entry '{key}'")?,
            SkipCategory::Response => write!(f, "components responses entry '{key}'")?,
        }
        f.write_str(" already exists in primary or higher priority mixin, skipping")
    }
}
