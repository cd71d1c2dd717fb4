//! Tree discovery: find every directory that directly holds at least one file.

use log::debug;
use std::collections::{BTreeSet, HashSet};

use crate::engine::tools::normalize_root;
use crate::error::LoadError;
use crate::storage::StorageLister;
use crate::types::LeafPartition;

/// Walk the tree under `root` with an explicit work list and return its leaf partitions,
/// deduplicated and sorted by path.
///
/// Every reachable directory is listed exactly once. A directory holding both files and
/// subdirectories is a leaf itself and its subdirectories are still walked. Any listing
/// failure aborts the whole walk: a partial partition set would silently skip data.
///
/// An empty result is returned as-is; the caller decides whether that is an error
/// (see [`require_partitions`]).
pub fn discover_leaf_partitions<L>(
    root: &str,
    lister: &L,
) -> Result<BTreeSet<LeafPartition>, LoadError>
where
    L: StorageLister + ?Sized,
{
    let root = normalize_root(root);
    let mut stack = vec![root];
    let mut visited: HashSet<String> = HashSet::new();
    let mut leaves = BTreeSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        let entries = lister
            .list_dir(&current)
            .map_err(|source| LoadError::StorageAccess {
                path: current.clone(),
                source,
            })?;

        let mut has_file = false;
        for entry in entries {
            if entry.is_directory {
                stack.push(normalize_root(&entry.path));
            } else {
                has_file = true;
            }
        }
        if has_file {
            debug!("leaf partition: {}", current);
            leaves.insert(LeafPartition::new(current));
        }
    }
    debug!(
        "discovery visited {} directories, found {} leaf partitions",
        visited.len(),
        leaves.len()
    );
    Ok(leaves)
}

/// Turn an empty discovery result into [`LoadError::NoPartitionsFound`].
pub fn require_partitions(
    root: &str,
    leaves: BTreeSet<LeafPartition>,
) -> Result<BTreeSet<LeafPartition>, LoadError> {
    if leaves.is_empty() {
        return Err(LoadError::NoPartitionsFound {
            root: normalize_root(root),
        });
    }
    Ok(leaves)
}
