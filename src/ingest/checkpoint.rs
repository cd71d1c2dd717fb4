//! Per-job checkpoint: which source files have already been appended to the table.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;
use crate::utils::tempfiles::write_atomic;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Source partition this checkpoint belongs to.
    pub source: String,
    /// File names (relative to `source`) already ingested.
    #[serde(default)]
    pub ingested: BTreeSet<String>,
}

impl Checkpoint {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ingested: BTreeSet::new(),
        }
    }
}

pub fn checkpoint_file(location: &Path) -> PathBuf {
    location.join(PackagePaths::get().checkpoint_filename())
}

/// Load the checkpoint at `location`, or start a fresh one for `source` if none exists.
/// A checkpoint recorded for a different source is refused: two partitions must never share one.
pub fn load_checkpoint(location: &Path, source: &str) -> Result<Checkpoint> {
    let path = checkpoint_file(location);
    if !path.exists() {
        return Ok(Checkpoint::new(source));
    }
    let raw =
        std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let checkpoint: Checkpoint =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    if checkpoint.source != source {
        bail!(
            "checkpoint {} belongs to source {}, not {}",
            location.display(),
            checkpoint.source,
            source
        );
    }
    Ok(checkpoint)
}

pub fn save_checkpoint(location: &Path, checkpoint: &Checkpoint) -> Result<()> {
    std::fs::create_dir_all(location)
        .with_context(|| format!("create checkpoint dir {}", location.display()))?;
    let bytes = serde_json::to_vec_pretty(checkpoint).context("serialize checkpoint")?;
    write_atomic(&checkpoint_file(location), &bytes)
}
