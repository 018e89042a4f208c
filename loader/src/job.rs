//! End-to-end merge runs: load, merge, write.
//!
//! ```no_run
//! use openapi_mixin_loader::MergeJob;
//!
//! let job = MergeJob::builder("api/openapi.yaml")
//!     .mixin("api/pets.yaml")
//!     .mixin("api/orders.yaml")
//!     .output("build/openapi.json")
//!     .expect_collisions(1)
//!     .build();
//!
//! let outcome = job.run().unwrap();
//! for skipped in &outcome.skipped {
//!     eprintln!("{skipped}");
//! }
//! job.verify(&outcome).unwrap();
//! ```

use std::path::{Path, PathBuf};

use openapi_mixin_core::{Document, Skipped, mixin};
use tracing::info;

use crate::error::{LoadError, Result};
use crate::loader::{DocumentFormat, load_document, load_documents, write_document};

/// Result of a merge run.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged primary document.
    pub document: Document,
    /// Every entry that lost a collision, in merge order.
    pub skipped: Vec<Skipped>,
}

impl MergeOutcome {
    /// Number of collisions the merge reported.
    pub fn collision_count(&self) -> usize {
        self.skipped.len()
    }

    /// Human-readable diagnostic lines, one per collision.
    pub fn messages(&self) -> Vec<String> {
        self.skipped.iter().map(ToString::to_string).collect()
    }
}

/// A fully described merge run.
#[derive(Debug, Clone)]
pub struct MergeJob {
    primary: PathBuf,
    mixins: Vec<PathBuf>,
    output: Option<PathBuf>,
    format: Option<DocumentFormat>,
    expected_collisions: Option<usize>,
}

impl MergeJob {
    /// Returns a [`MergeJobBuilder`] for a merge into `primary`.
    pub fn builder(primary: impl Into<PathBuf>) -> MergeJobBuilder {
        MergeJobBuilder::new(primary.into())
    }

    pub fn primary(&self) -> &Path {
        &self.primary
    }

    pub fn mixins(&self) -> &[PathBuf] {
        &self.mixins
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }

    /// Format of the merged document.
    ///
    /// Resolution order: the explicit format, the output file's extension,
    /// the primary file's extension, then JSON.
    pub fn format(&self) -> DocumentFormat {
        self.format
            .or_else(|| {
                self.output
                    .as_ref()
                    .and_then(|p| DocumentFormat::from_path(p).ok())
            })
            .or_else(|| DocumentFormat::from_path(&self.primary).ok())
            .unwrap_or(DocumentFormat::Json)
    }

    /// Loads every document, merges the mixins into the primary, and writes
    /// the result if an output path is set.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if any document cannot be loaded or the output
    /// cannot be written. Collisions are never errors here; see
    /// [`verify`](MergeJob::verify).
    pub fn run(&self) -> Result<MergeOutcome> {
        let mut document = load_document(&self.primary)?;
        let mixins = load_documents(&self.mixins)?;

        let skipped = mixin(&mut document, &mixins);
        info!(
            primary = %self.primary.display(),
            mixins = mixins.len(),
            collisions = skipped.len(),
            "merged documents"
        );

        if let Some(output) = &self.output {
            write_document(&document, output, self.format())?;
            info!(output = %output.display(), "wrote merged document");
        }

        Ok(MergeOutcome { document, skipped })
    }

    /// Checks the outcome against the expected collision count, if one was set.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnexpectedCollisions`] on a mismatch.
    pub fn verify(&self, outcome: &MergeOutcome) -> Result<()> {
        match self.expected_collisions {
            Some(expected) if expected != outcome.collision_count() => {
                Err(LoadError::UnexpectedCollisions {
                    expected,
                    actual: outcome.collision_count(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Builder for [`MergeJob`].
///
/// Mixins keep the order they are added in; that order is merge priority.
#[derive(Debug, Clone)]
pub struct MergeJobBuilder {
    job: MergeJob,
}

impl MergeJobBuilder {
    fn new(primary: PathBuf) -> Self {
        Self {
            job: MergeJob {
                primary,
                mixins: Vec::new(),
                output: None,
                format: None,
                expected_collisions: None,
            },
        }
    }

    /// Appends one mixin (lower priority than those already added).
    pub fn mixin(mut self, path: impl Into<PathBuf>) -> Self {
        self.job.mixins.push(path.into());
        self
    }

    /// Appends several mixins in order.
    pub fn mixins<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.job.mixins.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.job.output = Some(path.into());
        self
    }

    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.job.format = Some(format);
        self
    }

    pub fn expect_collisions(mut self, count: usize) -> Self {
        self.job.expected_collisions = Some(count);
        self
    }

    pub fn build(self) -> MergeJob {
        self.job
    }
}
