//! Pipeline components: discovery walk, planning, orchestration, outcome handling.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod plan;
pub mod walk;

pub use context::{NamingContext, expand_namespace};
pub use error_handler::check_run_outcome;
pub use orchestrator::run_jobs;
pub use plan::{JOIN_TOKEN, plan_jobs, table_identity};
pub use walk::{discover_leaf_partitions, require_partitions};
