//! Option layers: settings file, environment and CLI each produce an [`OptLayer`];
//! [`resolve_opts`] stacks them over the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

/// One configuration source. `None` and blank strings mean "not set here".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptLayer {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub source_root: Option<String>,
    pub source_format: Option<String>,
    pub header: Option<String>,
    pub infer_schema: Option<String>,
    pub volumes_root: Option<String>,
    pub warehouse: Option<String>,
    pub table_template: Option<String>,
    pub checkpoint_template: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub follow_links: Option<bool>,
    pub verbose: Option<bool>,
    /// Never read from the settings file.
    #[serde(skip)]
    pub dry_run: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    settings: OptLayer,
}

/// Parse settings file content (`[settings]` table).
pub fn parse_settings(content: &str) -> Result<OptLayer> {
    let file: SettingsFile = toml::from_str(content)?;
    Ok(file.settings)
}

/// Load an explicitly requested settings file. Missing or invalid files are errors.
pub fn load_settings_file(path: &Path) -> Result<OptLayer> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read settings file {}", path.display()))?;
    parse_settings(&s).with_context(|| format!("parse settings file {}", path.display()))
}

/// Load `<pkg>.toml` from `dir` if present. Returns None if the file does not exist.
pub fn find_settings_file(dir: &Path) -> Result<Option<OptLayer>> {
    let path = dir.join(PackagePaths::get().settings_filename());
    if !path.is_file() {
        return Ok(None);
    }
    load_settings_file(&path).map(Some)
}

/// Take a string value unless it is blank.
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Overwrite fields of `base` that `upper` sets (blank strings do not count).
macro_rules! overlay_str {
    ($base:expr, $upper:expr, $($field:ident),+) => {
        $(
            if let Some(v) = non_blank(&$upper.$field) {
                $base.$field = Some(v);
            }
        )+
    };
}

macro_rules! overlay_opt {
    ($base:expr, $upper:expr, $($field:ident),+) => {
        $(
            if let Some(v) = $upper.$field.clone() {
                $base.$field = Some(v);
            }
        )+
    };
}

impl OptLayer {
    /// Stack `upper` on top of `self`.
    pub fn overlay(&mut self, upper: &OptLayer) {
        overlay_str!(
            self,
            upper,
            catalog,
            schema,
            source_root,
            source_format,
            header,
            infer_schema,
            volumes_root,
            warehouse,
            table_template,
            checkpoint_template
        );
        overlay_opt!(self, upper, follow_links, verbose, dry_run);
        if let Some(patterns) = &upper.exclude {
            let patterns: Vec<String> = patterns
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if !patterns.is_empty() {
                self.exclude = Some(patterns);
            }
        }
    }
}

/// Resolve options from `layers` (lowest precedence first) over the built-in defaults.
/// `source_root` falls back to a path derived from the resolved catalog, schema and volumes root.
pub fn resolve_opts(layers: &[OptLayer]) -> Opts {
    let mut merged = OptLayer::default();
    for layer in layers {
        merged.overlay(layer);
    }
    let defaults = Opts::default();
    let mut opts = Opts {
        catalog: merged.catalog.unwrap_or(defaults.catalog),
        schema: merged.schema.unwrap_or(defaults.schema),
        source_root: String::new(),
        source_format: merged.source_format.unwrap_or(defaults.source_format),
        header: merged.header.unwrap_or(defaults.header),
        infer_schema: merged.infer_schema.unwrap_or(defaults.infer_schema),
        volumes_root: merged.volumes_root.unwrap_or(defaults.volumes_root),
        warehouse: merged.warehouse.unwrap_or(defaults.warehouse),
        table_template: merged.table_template.unwrap_or(defaults.table_template),
        checkpoint_template: merged
            .checkpoint_template
            .unwrap_or(defaults.checkpoint_template),
        exclude: merged.exclude.unwrap_or_default(),
        follow_links: merged.follow_links.unwrap_or(false),
        verbose: merged.verbose.unwrap_or(false),
        dry_run: merged.dry_run.unwrap_or(false),
    };
    opts.source_root = match merged.source_root {
        Some(root) => root,
        None => opts.default_source_root(),
    };
    opts
}
