use clap::Parser;
use std::path::PathBuf;

use crate::utils::settings::OptLayer;

/// Discover leaf partitions under a source root and load each into its own table.
#[derive(Clone, Parser)]
#[command(name = "leafload")]
#[command(about = "Load every leaf partition under a source root into its own table; use --dry-run to only plan.")]
pub struct Cli {
    /// Settings file. Default: `leafload.toml` in the working directory, when present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Destination catalog. Default: dev.
    #[arg(long)]
    pub catalog: Option<String>,

    /// Destination schema. Default: bronze.
    #[arg(long)]
    pub schema: Option<String>,

    /// Root to discover partitions under. Default: <volumes-root>/<catalog>/<schema>/raw/data.
    #[arg(long)]
    pub source_root: Option<String>,

    /// Source file format (csv, json, or anything else to copy files as-is). Default: csv.
    #[arg(long)]
    pub source_format: Option<String>,

    /// Whether the first line of each CSV file is a header (true/false). Default: true.
    #[arg(long)]
    pub header: Option<String>,

    /// Infer column types when a table is first created (true/false). Default: true.
    #[arg(long)]
    pub infer_schema: Option<String>,

    /// Local directory standing in for the volumes mount. Default: /Volumes.
    #[arg(long)]
    pub volumes_root: Option<String>,

    /// Local directory holding catalog namespaces and tables. Default: ./warehouse.
    #[arg(long)]
    pub warehouse: Option<String>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links while discovering and reading partitions.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Verbose output (debug logs and a progress bar).
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Discover and plan only; print the jobs without creating or loading anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Options set on the command line, as the top configuration layer.
    pub fn to_layer(&self) -> OptLayer {
        OptLayer {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            source_root: self.source_root.clone(),
            source_format: self.source_format.clone(),
            header: self.header.clone(),
            infer_schema: self.infer_schema.clone(),
            volumes_root: self.volumes_root.clone(),
            warehouse: self.warehouse.clone(),
            table_template: None,
            checkpoint_template: None,
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            follow_links: self.follow_links,
            verbose: self.verbose,
            dry_run: self.dry_run.then_some(true),
        }
    }
}
