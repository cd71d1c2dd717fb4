pub mod config;
pub mod env;
pub mod logger;
pub mod settings;
pub mod tempfiles;

pub use config::*;
pub use env::{env_layer, env_layer_from};
pub use logger::{Colors, JOB_THREAD_PREFIX, format_line, job_tag, setup_logging};
pub use settings::{OptLayer, find_settings_file, load_settings_file, parse_settings, resolve_opts};
pub use tempfiles::write_atomic;
