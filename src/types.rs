//! Public and internal types for the leafload API and pipeline.

use std::fmt;

/// One entry returned by listing a directory. Paths use `/` separators and carry no trailing separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageNode {
    pub path: String,
    pub is_directory: bool,
}

impl StorageNode {
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }
}

/// A directory that directly contains at least one data file.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LeafPartition {
    pub path: String,
}

impl LeafPartition {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Identity of a partition's destination: the flattened relative path and its identifier-safe form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableIdentity {
    /// Relative path with separators flattened to `_`.
    pub raw: String,
    /// Output of [`sanitize_identifier`](crate::engine::sanitize_identifier) on `raw`.
    pub sanitized: String,
}

/// A planned unit of work: load everything new under `source_path` into `destination_table`,
/// tracking progress at `checkpoint_location`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IngestionJob {
    pub source_path: String,
    pub identity: TableIdentity,
    pub destination_table: String,
    pub checkpoint_location: String,
}

impl fmt::Display for IngestionJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.destination_table, self.source_path)
    }
}

/// Per-job lifecycle as observed by the orchestrator. No transitions out of a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JobState {
    Submitted,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// What a finished job did. Counts cover this run only, not what earlier runs already checkpointed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JobReport {
    pub files_ingested: usize,
    pub files_already_checkpointed: usize,
    pub rows_ingested: u64,
}

/// Terminal outcome of one job.
#[derive(Debug)]
pub enum JobStatus {
    Succeeded(JobReport),
    Failed(anyhow::Error),
}

#[derive(Debug)]
pub struct JobResult {
    pub job: IngestionJob,
    pub status: JobStatus,
}

impl JobResult {
    pub fn state(&self) -> JobState {
        match self.status {
            JobStatus::Succeeded(_) => JobState::Succeeded,
            JobStatus::Failed(_) => JobState::Failed,
        }
    }
}

/// Aggregate of every job's terminal outcome for one run, in submission order.
#[derive(Debug, Default)]
pub struct RunOutcome {
    pub results: Vec<JobResult>,
}

impl RunOutcome {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&IngestionJob, &JobReport)> {
        self.results.iter().filter_map(|r| match &r.status {
            JobStatus::Succeeded(report) => Some((&r.job, report)),
            JobStatus::Failed(_) => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&IngestionJob, &anyhow::Error)> {
        self.results.iter().filter_map(|r| match &r.status {
            JobStatus::Failed(err) => Some((&r.job, err)),
            JobStatus::Succeeded(_) => None,
        })
    }

    pub fn succeeded_count(&self) -> usize {
        self.succeeded().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failed().count()
    }

    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Summary of a successful run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub partitions: usize,
    pub files_ingested: usize,
    pub rows_ingested: u64,
}

/// How the ingestion engine reads source files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReaderOptions {
    pub format: String,
    pub header: bool,
    pub infer_schema: bool,
}

/// Resolved options (defaults < file < env < CLI). String-valued fields mirror the external
/// configuration surface; see [`Opts::reader_options`] for the parsed reader flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Opts {
    pub catalog: String,
    pub schema: String,
    /// Discovery root. Derived from `volumes_root`, `catalog` and `schema` when unset.
    pub source_root: String,
    pub source_format: String,
    pub header: String,
    pub infer_schema: String,
    /// Local directory standing in for the `/Volumes` mount.
    pub volumes_root: String,
    /// Local directory holding catalog namespaces and tables.
    pub warehouse: String,
    pub table_template: String,
    pub checkpoint_template: String,
    /// Exclude patterns (glob syntax) applied to listed entries.
    pub exclude: Vec<String>,
    pub follow_links: bool,
    pub verbose: bool,
    /// Discover and plan only; nothing is bootstrapped or submitted.
    pub dry_run: bool,
}
