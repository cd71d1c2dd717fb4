use log::warn;

use crate::error::{JobFailure, LoadError};
use crate::types::{RunOutcome, RunSummary};

/// Convert a finished run into the process-level result: a summary when every job succeeded,
/// otherwise [`LoadError::JobsFailed`] listing each failed job and its cause.
/// Call only after [`run_jobs`](crate::pipeline::run_jobs) has returned.
pub fn check_run_outcome(outcome: &RunOutcome) -> Result<RunSummary, LoadError> {
    if !outcome.is_success() {
        let failures: Vec<JobFailure> = outcome
            .failed()
            .map(|(job, err)| JobFailure {
                identity: job.identity.sanitized.clone(),
                source_path: job.source_path.clone(),
                cause: format!("{:#}", err),
            })
            .collect();
        if outcome.succeeded_count() > 0 {
            warn!(
                "{} job(s) succeeded and keep their checkpoints; re-run to retry the failed ones",
                outcome.succeeded_count()
            );
        }
        return Err(LoadError::JobsFailed {
            total: outcome.total(),
            failures,
        });
    }
    let mut summary = RunSummary {
        partitions: outcome.total(),
        ..RunSummary::default()
    };
    for (_, report) in outcome.succeeded() {
        summary.files_ingested += report.files_ingested;
        summary.rows_ingested += report.rows_ingested;
    }
    Ok(summary)
}
