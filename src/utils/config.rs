//! Application configuration constants and option defaults.

use anyhow::{Result, bail};
use std::sync::OnceLock;

use crate::types::{Opts, ReaderOptions};

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    settings_filename: String,
    env_prefix: String,
    checkpoint_filename: String,
    table_meta_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                settings_filename: format!("{pkg}.toml"),
                env_prefix: format!("{}_", pkg.to_uppercase()),
                checkpoint_filename: "offsets.json".to_string(),
                table_meta_filename: "_table.json".to_string(),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Settings file looked up in the working directory when `--config` is not given.
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Prefix for environment overrides, e.g. `LEAFLOAD_CATALOG`.
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    pub fn checkpoint_filename(&self) -> &str {
        &self.checkpoint_filename
    }

    pub fn table_meta_filename(&self) -> &str {
        &self.table_meta_filename
    }
}

// ---- Defaults ----

/// Built-in defaults for every string option.
pub struct Defaults;

impl Defaults {
    pub const CATALOG: &'static str = "dev";
    pub const SCHEMA: &'static str = "bronze";
    pub const SOURCE_FORMAT: &'static str = "csv";
    pub const HEADER: &'static str = "true";
    pub const INFER_SCHEMA: &'static str = "true";
    pub const VOLUMES_ROOT: &'static str = "/Volumes";
    pub const WAREHOUSE: &'static str = "warehouse";
    /// Source root when none is configured; namespace placeholders resolved from the other options.
    pub const SOURCE_ROOT_TEMPLATE: &'static str = "{volumes_root}/{catalog}/{schema}/raw/data";
    pub const TABLE_TEMPLATE: &'static str = "{catalog}.{schema}.{table}";
    pub const CHECKPOINT_TEMPLATE: &'static str =
        "{volumes_root}/{catalog}/{schema}/checkpoints/{table}";
}

/// Volumes created by bootstrap.
pub struct Volumes;

impl Volumes {
    pub const RAW: &'static str = "raw";
    pub const CHECKPOINTS: &'static str = "checkpoints";
}

impl Default for Opts {
    fn default() -> Self {
        let mut opts = Opts {
            catalog: Defaults::CATALOG.to_string(),
            schema: Defaults::SCHEMA.to_string(),
            source_root: String::new(),
            source_format: Defaults::SOURCE_FORMAT.to_string(),
            header: Defaults::HEADER.to_string(),
            infer_schema: Defaults::INFER_SCHEMA.to_string(),
            volumes_root: Defaults::VOLUMES_ROOT.to_string(),
            warehouse: Defaults::WAREHOUSE.to_string(),
            table_template: Defaults::TABLE_TEMPLATE.to_string(),
            checkpoint_template: Defaults::CHECKPOINT_TEMPLATE.to_string(),
            exclude: Vec::new(),
            follow_links: false,
            verbose: false,
            dry_run: false,
        };
        opts.source_root = opts.default_source_root();
        opts
    }
}

/// Parse a `true`/`false` option (case-insensitive).
pub fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => bail!("option {} must be true or false, got '{}'", name, other),
    }
}

impl Opts {
    /// `source_root` derived from `volumes_root`, `catalog` and `schema`.
    pub fn default_source_root(&self) -> String {
        crate::pipeline::expand_namespace(Defaults::SOURCE_ROOT_TEMPLATE, self)
    }

    pub fn reader_options(&self) -> Result<ReaderOptions> {
        Ok(ReaderOptions {
            format: self.source_format.trim().to_ascii_lowercase(),
            header: parse_flag("header", &self.header)?,
            infer_schema: parse_flag("infer_schema", &self.infer_schema)?,
        })
    }
}
