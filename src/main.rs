//! leafload CLI: load every leaf partition under a source root; use --dry-run to only plan.

use anyhow::Result;
use clap::Parser;
use leafload::engine::arg_parser::Cli;
use leafload::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
