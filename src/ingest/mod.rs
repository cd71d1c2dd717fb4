//! Ingestion engine capability and the local checkpointed loader.

pub mod checkpoint;
pub mod local;
pub mod writer;

pub use checkpoint::{Checkpoint, load_checkpoint, save_checkpoint};
pub use local::{LocalEngine, LocalJobHandle};

use anyhow::Result;

use crate::types::{IngestionJob, JobReport};

/// Runs incremental load jobs. `submit` starts a job and returns at once; `wait` blocks until
/// that job is terminal. Re-submitting the same source and checkpoint after a partial run must
/// resume, not reprocess.
pub trait IngestionEngine {
    type Handle;

    fn submit(&self, job: &IngestionJob) -> Result<Self::Handle>;

    fn wait(&self, handle: Self::Handle) -> Result<JobReport>;
}
