//! Orchestrator tests: partial failure, out-of-order completion, rejected submissions.

use anyhow::{Result, anyhow, bail};
use leafload::error::LoadError;
use leafload::ingest::IngestionEngine;
use leafload::pipeline::{NamingContext, check_run_outcome, plan_jobs, run_jobs};
use leafload::{IngestionJob, JobReport, JobState, LeafPartition};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Clone)]
enum Script {
    Succeed { delay_ms: u64, files: usize },
    Fail { delay_ms: u64, msg: &'static str },
    RejectSubmit,
    PanicInWait,
}

/// Engine whose jobs sleep then succeed or fail per script, recording completion order.
struct ScriptedEngine {
    scripts: HashMap<String, Script>,
    finished: Arc<Mutex<Vec<String>>>,
    submitted: AtomicUsize,
    waited: AtomicUsize,
}

impl ScriptedEngine {
    fn new(scripts: &[(&str, Script)]) -> Self {
        Self {
            scripts: scripts
                .iter()
                .map(|(id, s)| (id.to_string(), s.clone()))
                .collect(),
            finished: Arc::new(Mutex::new(Vec::new())),
            submitted: AtomicUsize::new(0),
            waited: AtomicUsize::new(0),
        }
    }
}

struct Handle {
    panic_on_wait: bool,
    thread: Option<JoinHandle<Result<JobReport>>>,
}

impl IngestionEngine for ScriptedEngine {
    type Handle = Handle;

    fn submit(&self, job: &IngestionJob) -> Result<Handle> {
        let id = job.identity.sanitized.clone();
        let script = self
            .scripts
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("no script for {}", id))?;
        self.submitted.fetch_add(1, Ordering::SeqCst);
        let finished = Arc::clone(&self.finished);
        let (delay_ms, result): (u64, Result<JobReport>) = match script {
            Script::RejectSubmit => bail!("engine at capacity"),
            Script::PanicInWait => {
                return Ok(Handle {
                    panic_on_wait: true,
                    thread: None,
                });
            }
            Script::Succeed { delay_ms, files } => (
                delay_ms,
                Ok(JobReport {
                    files_ingested: files,
                    files_already_checkpointed: 0,
                    rows_ingested: files as u64 * 10,
                }),
            ),
            Script::Fail { delay_ms, msg } => (delay_ms, Err(anyhow!(msg))),
        };
        let thread = thread::spawn(move || {
            thread::sleep(Duration::from_millis(delay_ms));
            finished.lock().unwrap().push(id);
            result
        });
        Ok(Handle {
            panic_on_wait: false,
            thread: Some(thread),
        })
    }

    fn wait(&self, handle: Handle) -> Result<JobReport> {
        self.waited.fetch_add(1, Ordering::SeqCst);
        if handle.panic_on_wait {
            panic!("engine lost track of job");
        }
        match handle.thread {
            Some(t) => t.join().map_err(|_| anyhow!("job panicked"))?,
            None => bail!("no thread"),
        }
    }
}

fn jobs(names: &[&str]) -> Vec<IngestionJob> {
    let leaves: BTreeSet<LeafPartition> = names
        .iter()
        .map(|n| LeafPartition::new(format!("/root/{}", n)))
        .collect();
    plan_jobs(
        "/root",
        &leaves,
        &NamingContext::new("dev.bronze.{table}", "/ckpt/{table}"),
    )
    .unwrap()
}

#[test]
fn test_middle_job_fails_others_recorded() {
    let engine = ScriptedEngine::new(&[
        ("job1", Script::Succeed { delay_ms: 10, files: 1 }),
        ("job2", Script::Fail { delay_ms: 5, msg: "disk full" }),
        ("job3", Script::Succeed { delay_ms: 30, files: 2 }),
    ]);
    let outcome = run_jobs(&jobs(&["job1", "job2", "job3"]), &engine);

    assert_eq!(outcome.total(), 3);
    assert_eq!(outcome.succeeded_count(), 2);
    let failed: Vec<&str> = outcome
        .failed()
        .map(|(j, _)| j.identity.sanitized.as_str())
        .collect();
    assert_eq!(failed, vec!["job2"]);
    assert_eq!(outcome.results[2].state(), JobState::Succeeded);
    assert_eq!(engine.waited.load(Ordering::SeqCst), 3);
    assert_eq!(engine.finished.lock().unwrap().len(), 3);
}

#[test]
fn test_results_in_submission_order_despite_completion_order() {
    let engine = ScriptedEngine::new(&[
        ("a", Script::Succeed { delay_ms: 80, files: 1 }),
        ("b", Script::Succeed { delay_ms: 1, files: 1 }),
        ("c", Script::Fail { delay_ms: 1, msg: "bad row" }),
    ]);
    let outcome = run_jobs(&jobs(&["a", "b", "c"]), &engine);

    let order: Vec<&str> = outcome
        .results
        .iter()
        .map(|r| r.job.identity.sanitized.as_str())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    // All jobs were running concurrently: the short ones finished before the first wait returned.
    let finished = engine.finished.lock().unwrap();
    assert_eq!(finished.last().map(String::as_str), Some("a"));
    assert_eq!(outcome.failed_count(), 1);
}

#[test]
fn test_every_failure_kept_not_just_first() {
    let engine = ScriptedEngine::new(&[
        ("a", Script::Fail { delay_ms: 1, msg: "first" }),
        ("b", Script::Succeed { delay_ms: 1, files: 0 }),
        ("c", Script::Fail { delay_ms: 20, msg: "second" }),
    ]);
    let outcome = run_jobs(&jobs(&["a", "b", "c"]), &engine);
    let causes: Vec<String> = outcome.failed().map(|(_, e)| e.to_string()).collect();
    assert_eq!(causes, vec!["first", "second"]);

    match check_run_outcome(&outcome) {
        Err(LoadError::JobsFailed { total, failures }) => {
            assert_eq!(total, 3);
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].identity, "a");
            assert_eq!(failures[0].source_path, "/root/a");
            assert_eq!(failures[1].cause, "second");
        }
        other => panic!("expected JobsFailed, got {:?}", other),
    }
}

#[test]
fn test_jobs_failed_message_lists_each_job() {
    let engine = ScriptedEngine::new(&[
        ("a", Script::Fail { delay_ms: 1, msg: "boom" }),
        ("b", Script::Fail { delay_ms: 1, msg: "bang" }),
    ]);
    let outcome = run_jobs(&jobs(&["a", "b"]), &engine);
    let msg = check_run_outcome(&outcome).unwrap_err().to_string();
    assert!(msg.starts_with("2 of 2 ingestion job(s) failed"));
    assert!(msg.contains("a (/root/a): boom"));
    assert!(msg.contains("b (/root/b): bang"));
}

#[test]
fn test_rejected_submission_does_not_stop_siblings() {
    let engine = ScriptedEngine::new(&[
        ("a", Script::RejectSubmit),
        ("b", Script::Succeed { delay_ms: 5, files: 3 }),
    ]);
    let outcome = run_jobs(&jobs(&["a", "b"]), &engine);
    assert_eq!(engine.submitted.load(Ordering::SeqCst), 2);
    assert_eq!(engine.waited.load(Ordering::SeqCst), 1);
    assert_eq!(outcome.succeeded_count(), 1);
    let (job, err) = outcome.failed().next().unwrap();
    assert_eq!(job.identity.sanitized, "a");
    assert!(format!("{:#}", err).contains("engine at capacity"));
}

#[test]
fn test_panicking_wait_becomes_failure() {
    let engine = ScriptedEngine::new(&[
        ("a", Script::PanicInWait),
        ("b", Script::Succeed { delay_ms: 1, files: 1 }),
    ]);
    let outcome = run_jobs(&jobs(&["a", "b"]), &engine);
    assert_eq!(outcome.total(), 2);
    assert_eq!(outcome.results[0].state(), JobState::Failed);
    assert_eq!(outcome.results[1].state(), JobState::Succeeded);
}

#[test]
fn test_all_succeed_summary() {
    let engine = ScriptedEngine::new(&[
        ("a", Script::Succeed { delay_ms: 1, files: 2 }),
        ("b", Script::Succeed { delay_ms: 1, files: 3 }),
    ]);
    let outcome = run_jobs(&jobs(&["a", "b"]), &engine);
    let summary = check_run_outcome(&outcome).unwrap();
    assert_eq!(summary.partitions, 2);
    assert_eq!(summary.files_ingested, 5);
    assert_eq!(summary.rows_ingested, 50);
}

#[test]
fn test_no_jobs_is_empty_outcome() {
    let engine = ScriptedEngine::new(&[]);
    let outcome = run_jobs(&[], &engine);
    assert_eq!(outcome.total(), 0);
    assert!(outcome.is_success());
}

#[test]
fn test_terminal_states() {
    assert!(JobState::Succeeded.is_terminal());
    assert!(JobState::Failed.is_terminal());
    assert!(!JobState::Submitted.is_terminal());
    assert!(!JobState::Running.is_terminal());
}
