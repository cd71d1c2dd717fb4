//! Local filesystem lister (also covers mounted volumes).

use log::debug;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use crate::engine::tools::{path_to_storage_string, should_include_entry};
use crate::types::StorageNode;

use super::StorageLister;

/// Lists directories on the local filesystem, skipping OS-hidden files and excluded entries.
/// Symlinked directories are listed only when `follow_links` is set.
#[derive(Clone, Debug, Default)]
pub struct LocalLister {
    pub exclude: Vec<String>,
    pub follow_links: bool,
}

impl LocalLister {
    pub fn new(exclude: Vec<String>, follow_links: bool) -> Self {
        Self {
            exclude,
            follow_links,
        }
    }
}

fn walkdir_to_io(err: walkdir::Error) -> io::Error {
    let path = err.path().map(|p| p.display().to_string());
    match err.into_io_error() {
        Some(e) => e,
        None => io::Error::other(format!(
            "filesystem loop at {}",
            path.unwrap_or_else(|| "<unknown>".to_string())
        )),
    }
}

impl StorageLister for LocalLister {
    fn list_dir(&self, dir: &str) -> io::Result<Vec<StorageNode>> {
        let mut nodes = Vec::new();
        for entry in WalkDir::new(Path::new(dir))
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
        {
            let entry = entry.map_err(walkdir_to_io)?;
            let path = path_to_storage_string(entry.path());
            if !should_include_entry(&path, &self.exclude) {
                continue;
            }
            // Unfollowed links to directories are neither data files nor places to descend into.
            if !self.follow_links && entry.path_is_symlink() && entry.path().is_dir() {
                debug!("skipping directory symlink {}", path);
                continue;
            }
            nodes.push(StorageNode {
                path,
                is_directory: entry.file_type().is_dir(),
            });
        }
        Ok(nodes)
    }
}
