//! Environment layer: `LEAFLOAD_*` variables, after loading `.env` from the working directory.

use log::debug;

use crate::utils::config::PackagePaths;
use crate::utils::settings::OptLayer;

/// Load `.env` (if any) into the process environment, then read the environment layer.
pub fn env_layer() -> OptLayer {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("loaded {}", path.display());
    }
    env_layer_from(|key| std::env::var(key).ok())
}

/// Build the environment layer from `lookup` (variable name -> value).
/// `EXCLUDE` is a comma-separated list; `FOLLOW_LINKS`/`VERBOSE` accept `true`/`false`/`1`/`0`;
/// anything else is treated as unset.
pub fn env_layer_from<F>(lookup: F) -> OptLayer
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = PackagePaths::get().env_prefix();
    let get = |name: &str| lookup(&format!("{prefix}{name}"));
    let flag = |name: &str| {
        get(name).and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        })
    };
    OptLayer {
        catalog: get("CATALOG"),
        schema: get("SCHEMA"),
        source_root: get("SOURCE_ROOT"),
        source_format: get("SOURCE_FORMAT"),
        header: get("HEADER"),
        infer_schema: get("INFER_SCHEMA"),
        volumes_root: get("VOLUMES_ROOT"),
        warehouse: get("WAREHOUSE"),
        table_template: get("TABLE_TEMPLATE"),
        checkpoint_template: get("CHECKPOINT_TEMPLATE"),
        exclude: get("EXCLUDE").map(|v| v.split(',').map(str::to_string).collect()),
        follow_links: flag("FOLLOW_LINKS"),
        verbose: flag("VERBOSE"),
        dry_run: None,
    }
}
