//! Local engine: one thread per job, checkpointed "process everything available, then stop".

use anyhow::{Context, Result, anyhow, bail};
use crossbeam_channel::Sender;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::tools::file_name;
use crate::ingest::checkpoint::{load_checkpoint, save_checkpoint};
use crate::ingest::writer::append_file;
use crate::ingest::IngestionEngine;
use crate::storage::{LocalLister, StorageLister};
use crate::types::{IngestionJob, JobReport, ReaderOptions};
use crate::utils::logger::JOB_THREAD_PREFIX;

/// Engine writing tables under `warehouse/<catalog>/<schema>/<table>`.
#[derive(Clone, Debug)]
pub struct LocalEngine {
    warehouse: PathBuf,
    reader: ReaderOptions,
    lister: LocalLister,
    cancel: Option<Arc<AtomicBool>>,
    notifier: Option<Sender<String>>,
}

/// Handle to a running job thread.
pub struct LocalJobHandle {
    identity: String,
    thread: JoinHandle<Result<JobReport>>,
}

impl LocalJobHandle {
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

impl LocalEngine {
    pub fn new(warehouse: impl Into<PathBuf>, reader: ReaderOptions, lister: LocalLister) -> Self {
        Self {
            warehouse: warehouse.into(),
            reader,
            lister,
            cancel: None,
            notifier: None,
        }
    }

    /// Jobs check `flag` between files and stop early once it is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Each job sends its identity on `tx` when it finishes, successful or not.
    pub fn with_notifier(mut self, tx: Sender<String>) -> Self {
        self.notifier = Some(tx);
        self
    }

    /// Directory for a `catalog.schema.table` destination.
    pub fn table_dir(&self, destination_table: &str) -> Result<PathBuf> {
        let parts: Vec<&str> = destination_table.split('.').collect();
        let valid = parts.len() == 3
            && parts
                .iter()
                .all(|p| !p.is_empty() && *p != ".." && !p.contains(['/', '\\']));
        if !valid {
            bail!(
                "destination table '{}' is not of the form catalog.schema.table",
                destination_table
            );
        }
        Ok(parts
            .iter()
            .fold(self.warehouse.clone(), |dir, part| dir.join(part)))
    }
}

/// Everything a job thread needs, owned.
struct JobTask {
    job: IngestionJob,
    table_dir: PathBuf,
    reader: ReaderOptions,
    lister: LocalLister,
    cancel: Option<Arc<AtomicBool>>,
}

impl JobTask {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|c| c.load(Ordering::Relaxed))
    }

    fn run(&self) -> Result<JobReport> {
        let job = &self.job;
        let checkpoint_dir = Path::new(&job.checkpoint_location);
        let mut checkpoint = load_checkpoint(checkpoint_dir, &job.source_path)?;
        let files: Vec<String> = self
            .lister
            .list_dir(&job.source_path)
            .with_context(|| format!("list source partition {}", job.source_path))?
            .into_iter()
            .filter(|node| !node.is_directory)
            .map(|node| node.path)
            .collect();

        let mut report = JobReport::default();
        for path in files {
            let name = file_name(&path).to_string();
            if checkpoint.ingested.contains(&name) {
                report.files_already_checkpointed += 1;
                continue;
            }
            if self.cancelled() {
                bail!(
                    "cancelled after {} new file(s); checkpoint keeps progress",
                    report.files_ingested
                );
            }
            let rows = append_file(&self.table_dir, Path::new(&path), &self.reader)
                .with_context(|| format!("ingest {}", path))?;
            checkpoint.ingested.insert(name);
            save_checkpoint(checkpoint_dir, &checkpoint)?;
            report.files_ingested += 1;
            report.rows_ingested += rows;
        }
        debug!(
            "{}: {} new file(s), {} row(s), {} already checkpointed",
            job.destination_table,
            report.files_ingested,
            report.rows_ingested,
            report.files_already_checkpointed
        );
        Ok(report)
    }
}

impl IngestionEngine for LocalEngine {
    type Handle = LocalJobHandle;

    fn submit(&self, job: &IngestionJob) -> Result<LocalJobHandle> {
        let task = JobTask {
            job: job.clone(),
            table_dir: self.table_dir(&job.destination_table)?,
            reader: self.reader.clone(),
            lister: self.lister.clone(),
            cancel: self.cancel.clone(),
        };
        let identity = job.identity.sanitized.clone();
        let notifier = self.notifier.clone();
        let notify_as = identity.clone();
        let thread = thread::Builder::new()
            .name(format!("{}{}", JOB_THREAD_PREFIX, identity))
            .spawn(move || {
                let result = task.run();
                if let Some(tx) = notifier {
                    let _ = tx.send(notify_as);
                }
                result
            })
            .with_context(|| format!("spawn job thread for {}", identity))?;
        Ok(LocalJobHandle { identity, thread })
    }

    fn wait(&self, handle: LocalJobHandle) -> Result<JobReport> {
        handle
            .thread
            .join()
            .map_err(|_| anyhow!("job thread for {} panicked", handle.identity))?
    }
}
