//! Reading and writing documents as JSON or YAML.
//!
//! # Loading patterns
//!
//! ```no_run
//! use openapi_mixin_loader::{DocumentFormat, load_document, load_documents, write_document};
//!
//! // One file, format picked from the extension
//! let primary = load_document("api/openapi.yaml").unwrap();
//!
//! // Several files, parsed in parallel, returned in the given order
//! let mixins = load_documents(&["api/pets.yaml", "api/orders.json"]).unwrap();
//!
//! write_document(&primary, "build/openapi.json", DocumentFormat::Json).unwrap();
//! ```

use std::path::Path;

use openapi_mixin_core::Document;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LoadError, Result};

/// Text format of a document file.
///
/// # Examples
///
/// ```
/// use openapi_mixin_loader::DocumentFormat;
///
/// assert_eq!(DocumentFormat::from_path("openapi.YML").unwrap(), DocumentFormat::Yaml);
/// assert_eq!(DocumentFormat::from_path("openapi.json").unwrap(), DocumentFormat::Json);
/// assert!(DocumentFormat::from_path("openapi.txt").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detects the format from a file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnsupportedFormat`] for anything other than
    /// `.json`, `.yaml` or `.yml`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(LoadError::UnsupportedFormat(ext)),
        }
    }
}

/// Parses a document from text.
///
/// # Errors
///
/// Returns [`LoadError::YamlError`] if YAML text does not parse, and
/// [`LoadError::JsonError`] if JSON text does not parse or the parsed tree
/// is not a valid document.
///
/// # Examples
///
/// ```
/// use openapi_mixin_loader::{DocumentFormat, parse_document};
///
/// let yaml = r#"
/// openapi: 3.0.3
/// info:
///   title: Pets
///   version: "1.0"
/// paths:
///   /pets:
///     get:
///       operationId: listPets
/// "#;
/// let doc = parse_document(yaml, DocumentFormat::Yaml).unwrap();
/// assert_eq!(doc.info.unwrap().title.as_deref(), Some("Pets"));
/// assert!(doc.paths.unwrap().contains_key("/pets"));
/// ```
pub fn parse_document(raw: &str, format: DocumentFormat) -> Result<Document> {
    let document = match format {
        DocumentFormat::Json => serde_json::from_str(raw)?,
        DocumentFormat::Yaml => {
            // Flattened maps would keep unquoted keys such as `200:` as
            // integers; going through a JSON value turns them into strings.
            let value: serde_json::Value = serde_yaml::from_str(raw)?;
            serde_json::from_value(value)?
        }
    };
    Ok(document)
}

/// Renders a document as text. JSON output is pretty-printed.
///
/// # Errors
///
/// Returns [`LoadError::JsonError`] or [`LoadError::YamlError`] if
/// serialization fails.
pub fn render_document(document: &Document, format: DocumentFormat) -> Result<String> {
    let mut raw = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(document)?,
        DocumentFormat::Yaml => serde_yaml::to_string(document)?,
    };
    if !raw.ends_with('\n') {
        raw.push('\n');
    }
    Ok(raw)
}

/// Loads a document from a `.json`, `.yaml` or `.yml` file.
///
/// # Errors
///
/// Returns [`LoadError::Document`] wrapping the underlying I/O, format, or
/// parse failure, with the offending path attached.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    read_document(path).map_err(|source| LoadError::Document {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn read_document(path: &Path) -> Result<Document> {
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path)?;
    let document = parse_document(&raw, format)?;
    debug!(path = %path.display(), ?format, "loaded document");
    Ok(document)
}

/// Loads several documents in parallel.
///
/// The returned documents are in the same order as `paths`, which matters
/// because mixin order is merge priority.
///
/// # Errors
///
/// Returns a [`LoadError::Document`] if any file fails to load. When several
/// fail, which one is reported is unspecified.
pub fn load_documents<P>(paths: &[P]) -> Result<Vec<Document>>
where
    P: AsRef<Path> + Sync,
{
    paths.par_iter().map(load_document).collect()
}

/// Writes a document to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`LoadError::IoError`] if the file cannot be written, or a
/// serialization error from [`render_document`].
pub fn write_document(
    document: &Document,
    path: impl AsRef<Path>,
    format: DocumentFormat,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, render_document(document, format)?)?;
    debug!(path = %path.display(), ?format, "wrote document");
    Ok(())
}
