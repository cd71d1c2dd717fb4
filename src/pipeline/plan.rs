//! Job planning: map leaf partitions to (table, checkpoint, source) jobs.

use std::collections::{BTreeSet, HashMap};

use crate::engine::sanitize_identifier;
use crate::engine::tools::{SEPARATOR, normalize_root, path_relative_to};
use crate::error::LoadError;
use crate::pipeline::context::NamingContext;
use crate::types::{IngestionJob, LeafPartition, TableIdentity};

/// Token that replaces path separators when flattening a relative path.
pub const JOIN_TOKEN: &str = "_";

/// Identity of `leaf` relative to `root`. A leaf equal to the root keeps its full path,
/// since there is no root prefix to strip.
pub fn table_identity(root: &str, leaf: &LeafPartition) -> TableIdentity {
    let root = normalize_root(root);
    let relative = path_relative_to(&leaf.path, &root).unwrap_or(&leaf.path);
    let raw = relative.replace(SEPARATOR, JOIN_TOKEN);
    let sanitized = sanitize_identifier(&raw);
    TableIdentity { raw, sanitized }
}

/// Build one job per leaf, sorted by leaf path. Pure: the same inputs always give the same
/// jobs in the same order, so a re-run after a partial failure reuses the same checkpoints.
///
/// Fails with [`LoadError::IdentityCollision`] if two leaves sanitize to the same identity,
/// rather than letting them share a table and checkpoint.
pub fn plan_jobs(
    root: &str,
    leaves: &BTreeSet<LeafPartition>,
    naming: &NamingContext,
) -> Result<Vec<IngestionJob>, LoadError> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(leaves.len());
    let mut jobs = Vec::with_capacity(leaves.len());

    for leaf in leaves {
        let identity = table_identity(root, leaf);
        if let Some(first) = seen.insert(identity.sanitized.clone(), &leaf.path) {
            return Err(LoadError::IdentityCollision {
                identity: identity.sanitized,
                first: first.to_string(),
                second: leaf.path.clone(),
            });
        }
        jobs.push(IngestionJob {
            source_path: leaf.path.clone(),
            destination_table: naming.table_for(&identity.sanitized),
            checkpoint_location: naming.checkpoint_for(&identity.sanitized),
            identity,
        });
    }
    Ok(jobs)
}
