//! Document loading, writing, and merge-job plumbing for `openapi-mixin`.
//!
//! The merge engine in `openapi-mixin-core` works on in-memory documents
//! only. This crate supplies the file side:
//!
//! - [`load_document`] / [`load_documents`] / [`write_document`]: JSON and
//!   YAML document I/O, format picked from the file extension.
//! - [`MixinConfig`]: YAML configuration naming the primary, the mixins in
//!   priority order, the output, and the expected collision count.
//! - [`MergeJob`]: runs a merge end to end and checks the collision count.
//!
//! # Quick start
//!
//! ```no_run
//! use openapi_mixin_loader::{MergeJob, MixinConfig};
//!
//! // Drive a merge from a configuration file
//! let config = MixinConfig::load("mixin.yaml").unwrap();
//! let job = config.to_job().unwrap();
//! let outcome = job.run().unwrap();
//! job.verify(&outcome).unwrap();
//!
//! // Or build the job directly
//! let outcome = MergeJob::builder("openapi.yaml")
//!     .mixin("pets.yaml")
//!     .build()
//!     .run()
//!     .unwrap();
//! println!("{} collision(s)", outcome.collision_count());
//! ```

mod config;
mod error;
mod job;
mod loader;

pub use config::MixinConfig;
pub use error::{LoadError, Result};
pub use job::{MergeJob, MergeJobBuilder, MergeOutcome};
pub use loader::{
    DocumentFormat, load_document, load_documents, parse_document, render_document,
    write_document,
};
