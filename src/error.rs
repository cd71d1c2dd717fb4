//! Error taxonomy for a load run.
//!
//! Discovery and planning errors abort the run before anything is submitted. Job errors are
//! collected by the orchestrator and surface together as [`LoadError::JobsFailed`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    /// Listing a directory failed during discovery.
    #[error("storage access failed while listing {path}: {source}")]
    StorageAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Discovery succeeded but found no directory holding a file.
    #[error("No input files found under {root}")]
    NoPartitionsFound { root: String },

    /// Two partitions sanitize to the same table identity and would share a table and checkpoint.
    #[error("partitions {first} and {second} both map to table identity '{identity}'")]
    IdentityCollision {
        identity: String,
        first: String,
        second: String,
    },

    /// Catalog namespace or volume could not be created.
    #[error("catalog bootstrap failed: {0}")]
    Bootstrap(String),

    /// One or more jobs reached the Failed state. Every failure is listed.
    #[error("{} of {total} ingestion job(s) failed:{}", .failures.len(), list_failures(.failures))]
    JobsFailed {
        total: usize,
        failures: Vec<JobFailure>,
    },
}

/// One job's terminal failure, detailed enough to retry selectively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobFailure {
    pub identity: String,
    pub source_path: String,
    pub cause: String,
}

fn list_failures(failures: &[JobFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("\n  {} ({}): {}", f.identity, f.source_path, f.cause))
        .collect()
}
