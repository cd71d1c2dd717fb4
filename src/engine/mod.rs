//! Engine module: identifier and path helpers, CLI wiring, progress display.

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod sanitize;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::handle_run;
pub use sanitize::{FALLBACK_IDENTIFIER, sanitize_identifier};
pub use tools::{glob_match, normalize_root, path_relative_to, should_include_entry};
