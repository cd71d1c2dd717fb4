//! Catalog bootstrap: make sure the destination namespace and volumes exist before discovery.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::utils::config::Volumes;

/// Catalog/namespace service. Both calls are idempotent.
pub trait Catalog {
    fn ensure_namespace(&self, catalog: &str, schema: &str) -> Result<()>;
    fn ensure_volume(&self, catalog: &str, schema: &str, volume: &str) -> Result<()>;
}

/// Catalog backed by local directories: namespaces under `warehouse`, volumes under `volumes_root`.
#[derive(Clone, Debug)]
pub struct LocalCatalog {
    pub volumes_root: PathBuf,
    pub warehouse: PathBuf,
}

impl LocalCatalog {
    pub fn new(volumes_root: impl Into<PathBuf>, warehouse: impl Into<PathBuf>) -> Self {
        Self {
            volumes_root: volumes_root.into(),
            warehouse: warehouse.into(),
        }
    }

    pub fn namespace_dir(&self, catalog: &str, schema: &str) -> PathBuf {
        self.warehouse.join(catalog).join(schema)
    }

    pub fn volume_dir(&self, catalog: &str, schema: &str, volume: &str) -> PathBuf {
        self.volumes_root.join(catalog).join(schema).join(volume)
    }
}

fn create_dir(path: &Path, what: &str) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create {} at {}", what, path.display()))?;
    debug!("{} ready: {}", what, path.display());
    Ok(())
}

impl Catalog for LocalCatalog {
    fn ensure_namespace(&self, catalog: &str, schema: &str) -> Result<()> {
        create_dir(&self.namespace_dir(catalog, schema), "namespace")
    }

    fn ensure_volume(&self, catalog: &str, schema: &str, volume: &str) -> Result<()> {
        create_dir(&self.volume_dir(catalog, schema, volume), "volume")
    }
}

/// Ensure `catalog.schema` plus its raw and checkpoint volumes exist. Single-threaded, runs once
/// before any job starts.
pub fn bootstrap<C>(catalog: &C, catalog_name: &str, schema: &str) -> Result<(), LoadError>
where
    C: Catalog + ?Sized,
{
    let run = || -> Result<()> {
        catalog.ensure_namespace(catalog_name, schema)?;
        catalog.ensure_volume(catalog_name, schema, Volumes::RAW)?;
        catalog.ensure_volume(catalog_name, schema, Volumes::CHECKPOINTS)?;
        Ok(())
    };
    run().map_err(|e| LoadError::Bootstrap(format!("{:#}", e)))
}
