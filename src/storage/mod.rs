//! Storage listing capability used by discovery.

pub mod local;

pub use local::LocalLister;

use crate::types::StorageNode;

/// Lists the direct entries of one directory. Implementations must not recurse.
pub trait StorageLister {
    fn list_dir(&self, dir: &str) -> std::io::Result<Vec<StorageNode>>;
}

impl<T: StorageLister + ?Sized> StorageLister for &T {
    fn list_dir(&self, dir: &str) -> std::io::Result<Vec<StorageNode>> {
        (**self).list_dir(dir)
    }
}
