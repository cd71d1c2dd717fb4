//! Job orchestration: submit every job, then wait on each one in submission order.

use anyhow::anyhow;
use log::{debug, error, info};
use std::panic::{self, AssertUnwindSafe};

use crate::ingest::IngestionEngine;
use crate::types::{IngestionJob, JobResult, JobState, JobStatus, RunOutcome};

/// A job after submission: either running behind an engine handle, or rejected by `submit`.
enum Submitted<H> {
    Running(IngestionJob, H),
    Rejected(IngestionJob, anyhow::Error),
}

fn log_transition(job: &IngestionJob, state: JobState) {
    debug!("{} -> {:?}", job.identity.sanitized, state);
}

/// Submit all `jobs` to `engine`, then wait for every one of them to reach a terminal state.
///
/// Submission is non-blocking, so all jobs run concurrently before the first wait. Waits happen
/// in submission order; a failure is recorded and the loop moves on, so later jobs are still
/// observed. A panic inside `wait` is caught and becomes that job's failure. Nothing here
/// cancels or resubmits a job.
pub fn run_jobs<E>(jobs: &[IngestionJob], engine: &E) -> RunOutcome
where
    E: IngestionEngine + ?Sized,
{
    let submitted: Vec<Submitted<E::Handle>> = jobs
        .iter()
        .cloned()
        .map(|job| match engine.submit(&job) {
            Ok(handle) => {
                log_transition(&job, JobState::Submitted);
                Submitted::Running(job, handle)
            }
            Err(err) => Submitted::Rejected(job, err.context("job submission rejected")),
        })
        .collect();
    info!("Submitted {} ingestion job(s)", submitted.len());

    let mut outcome = RunOutcome {
        results: Vec::with_capacity(submitted.len()),
    };
    for item in submitted {
        let result = match item {
            Submitted::Running(job, handle) => {
                log_transition(&job, JobState::Running);
                let status = match panic::catch_unwind(AssertUnwindSafe(|| engine.wait(handle))) {
                    Ok(Ok(report)) => JobStatus::Succeeded(report),
                    Ok(Err(err)) => JobStatus::Failed(err),
                    Err(_) => JobStatus::Failed(anyhow!("engine panicked while waiting on job")),
                };
                JobResult { job, status }
            }
            Submitted::Rejected(job, err) => JobResult {
                job,
                status: JobStatus::Failed(err),
            },
        };
        log_transition(&result.job, result.state());
        if let JobStatus::Failed(err) = &result.status {
            error!("{} failed: {:#}", result.job, err);
        }
        outcome.results.push(result);
    }
    debug!(
        "all {} job(s) terminal: {} succeeded, {} failed",
        outcome.total(),
        outcome.succeeded_count(),
        outcome.failed_count()
    );
    outcome
}
