//! CLI command handler: load by default; --dry-run only discovers and plans.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::Opts;
use crate::catalog::LocalCatalog;
use crate::engine::arg_parser::Cli;
use crate::engine::progress::{create_progress_bar, spawn_progress_listener};
use crate::ingest::LocalEngine;
use crate::{load_tree_with, plan_tree};
use crate::storage::LocalLister;
use crate::utils::{env_layer, find_settings_file, load_settings_file, resolve_opts, setup_logging};

/// Resolve options: defaults < settings file < environment < command line.
fn setup_opts(cli: &Cli) -> Result<Opts> {
    let file_layer = match &cli.config {
        Some(path) => Some(load_settings_file(path)?),
        None => find_settings_file(&std::env::current_dir().context("read working directory")?)?,
    };
    let mut layers = Vec::with_capacity(3);
    layers.extend(file_layer);
    layers.push(env_layer());
    layers.push(cli.to_layer());
    let opts = resolve_opts(&layers);
    setup_logging(opts.verbose);
    Ok(opts)
}

/// Print the planned jobs without touching the catalog or engine.
fn handle_dry_run(opts: &Opts, lister: &LocalLister) -> Result<()> {
    warn!("RUNNING IN DRY-RUN MODE. NOTHING WILL BE CREATED OR LOADED.");
    let jobs = plan_tree(opts, lister)?;
    for job in &jobs {
        println!(
            "{} -> {} ({})",
            job.source_path, job.destination_table, job.checkpoint_location
        );
    }
    info!("{} partition(s) planned under {}", jobs.len(), opts.source_root);
    Ok(())
}

/// Run a load (default) or plan only when --dry-run.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );
    let reader = opts.reader_options()?;
    let lister = LocalLister::new(opts.exclude.clone(), opts.follow_links);
    if opts.dry_run {
        return handle_dry_run(&opts, &lister);
    }

    let catalog = LocalCatalog::new(&opts.volumes_root, &opts.warehouse);
    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let (done_tx, done_rx) = crossbeam_channel::unbounded::<String>();
    let engine = LocalEngine::new(&opts.warehouse, reader, lister.clone())
        .with_cancel_flag(Arc::clone(&cancel_requested))
        .with_notifier(done_tx);

    let mut progress = None;
    let result = load_tree_with(&opts, &lister, &catalog, &engine, |jobs| {
        if opts.verbose {
            progress = Some((
                jobs.len(),
                spawn_progress_listener(done_rx, create_progress_bar(jobs.len(), "Loading")),
            ));
        }
    });
    // Dropping the engine drops the last notifier so the progress thread exits.
    drop(engine);
    if let Some((total, handle)) = progress {
        match handle.join() {
            Ok(finished) => debug!("progress saw {} of {} job(s) finish", finished, total),
            Err(_) => warn!("progress display thread panicked"),
        }
    }

    result?;
    if cancel_requested.load(Ordering::Relaxed) {
        warn!("Ctrl+C arrived after every job had finished; nothing was cut short");
    }
    Ok(())
}
