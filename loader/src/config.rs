//! Merge-job configuration.
//!
//! Defines the YAML-serializable configuration that names the primary
//! document, the mixins in priority order, and where the result goes.
//!
//! # Example YAML
//!
//! ```yaml
//! primary: api/openapi.yaml
//! mixins:
//!   - api/pets.yaml
//!   - api/orders.yaml
//! output: build/openapi.json
//! format: json
//! expected_collisions: 2
//! ```
//!
//! Relative paths are resolved against the directory holding the
//! configuration file.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};
use crate::job::MergeJob;
use crate::loader::DocumentFormat;

/// Configuration of one merge run.
///
/// # Examples
///
/// ```
/// # let yaml = r#"
/// # primary: openapi.yaml
/// # mixins: [pets.yaml, orders.yaml]
/// # "#;
/// let config: openapi_mixin_loader::MixinConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.mixins.len(), 2);
/// assert!(config.output.is_none());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixinConfig {
    /// Document the mixins are merged into.
    pub primary: PathBuf,
    /// Mixin documents, highest priority first.
    pub mixins: Vec<PathBuf>,
    /// Where to write the merged document. Omitted means no file is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Output format; defaults to the output file's extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DocumentFormat>,
    /// Number of collisions the merge is expected to report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_collisions: Option<usize>,
}

impl MixinConfig {
    /// Loads configuration from a YAML file and resolves relative paths
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoadError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::LoadError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoadError::IoError) if the file cannot be
    /// written, or [`YamlError`](crate::LoadError::YamlError) if
    /// serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Makes every relative path relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        resolve(&mut self.primary);
        self.mixins.iter_mut().for_each(resolve);
        if let Some(output) = self.output.as_mut() {
            resolve(output);
        }
    }

    /// Checks that the configuration describes a usable merge.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](crate::LoadError::InvalidConfig) if no mixins
    /// are listed or a mixin is the primary document itself.
    pub fn validate(&self) -> Result<()> {
        if self.mixins.is_empty() {
            return Err(LoadError::InvalidConfig("no mixins listed".to_string()));
        }
        if let Some(dup) = self.mixins.iter().find(|m| **m == self.primary) {
            return Err(LoadError::InvalidConfig(format!(
                "mixin '{}' is the primary document",
                dup.display()
            )));
        }
        Ok(())
    }

    /// Builds the [`MergeJob`] this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns the error from [`validate`](MixinConfig::validate).
    pub fn to_job(&self) -> Result<MergeJob> {
        self.validate()?;
        let mut builder = MergeJob::builder(&self.primary).mixins(self.mixins.iter().cloned());
        if let Some(output) = &self.output {
            builder = builder.output(output);
        }
        if let Some(format) = self.format {
            builder = builder.format(format);
        }
        if let Some(expected) = self.expected_collisions {
            builder = builder.expect_collisions(expected);
        }
        Ok(builder.build())
    }
}
