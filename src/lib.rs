//! Leafload: discover leaf data partitions under a storage tree and drive one checkpointed
//! incremental load job per partition.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod storage;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{JobFailure, LoadError};
pub use types::*;

use log::info;

use crate::catalog::{Catalog, bootstrap};
use crate::ingest::IngestionEngine;
use crate::pipeline::{
    NamingContext, check_run_outcome, discover_leaf_partitions, plan_jobs, require_partitions,
    run_jobs,
};
use crate::storage::StorageLister;
use crate::utils::Colors;

/// Discover the leaf partitions under `opts.source_root` and plan one job each.
///
/// Fails with [`LoadError::NoPartitionsFound`] when the tree holds no files, with
/// [`LoadError::StorageAccess`] when any listing fails, and with
/// [`LoadError::IdentityCollision`] when two partitions would share a table.
pub fn plan_tree<L>(opts: &Opts, lister: &L) -> Result<Vec<IngestionJob>, LoadError>
where
    L: StorageLister + ?Sized,
{
    let leaves = discover_leaf_partitions(&opts.source_root, lister)?;
    let leaves = require_partitions(&opts.source_root, leaves)?;
    plan_jobs(&opts.source_root, &leaves, &NamingContext::from_opts(opts))
}

/// Single entry point: bootstrap the namespace, discover, plan, run every job and wait for all
/// of them. Returns a summary only if every job succeeded; otherwise
/// [`LoadError::JobsFailed`] lists each failure.
///
/// ```ignore
/// let opts = leafload::Opts { source_root: "/data/raw".into(), ..Default::default() };
/// let lister = leafload::storage::LocalLister::default();
/// let catalog = leafload::catalog::LocalCatalog::new(&opts.volumes_root, &opts.warehouse);
/// let engine = leafload::ingest::LocalEngine::new(&opts.warehouse, opts.reader_options()?, lister.clone());
/// let summary = leafload::load_tree(&opts, &lister, &catalog, &engine)?;
/// ```
pub fn load_tree<L, C, E>(
    opts: &Opts,
    lister: &L,
    catalog: &C,
    engine: &E,
) -> Result<RunSummary, LoadError>
where
    L: StorageLister + ?Sized,
    C: Catalog + ?Sized,
    E: IngestionEngine + ?Sized,
{
    load_tree_with(opts, lister, catalog, engine, |_| {})
}

/// [`load_tree`], calling `on_planned` with the jobs after planning and before any is submitted.
pub fn load_tree_with<L, C, E, F>(
    opts: &Opts,
    lister: &L,
    catalog: &C,
    engine: &E,
    on_planned: F,
) -> Result<RunSummary, LoadError>
where
    L: StorageLister + ?Sized,
    C: Catalog + ?Sized,
    E: IngestionEngine + ?Sized,
    F: FnOnce(&[IngestionJob]),
{
    bootstrap(catalog, &opts.catalog, &opts.schema)?;
    let jobs = plan_tree(opts, lister)?;
    on_planned(&jobs);
    let outcome = run_jobs(&jobs, engine);
    info!(
        "{} | {}",
        Colors::colorize(
            Colors::SUCCEEDED,
            &format!("Succeeded: {}", outcome.succeeded_count())
        ),
        Colors::colorize(Colors::FAILED, &format!("Failed: {}", outcome.failed_count()))
    );
    let summary = check_run_outcome(&outcome)?;
    info!(
        "Load complete. Created/updated {} table(s) in {}.{} ({} new file(s), {} row(s)).",
        summary.partitions, opts.catalog, opts.schema, summary.files_ingested, summary.rows_ingested
    );
    Ok(summary)
}
