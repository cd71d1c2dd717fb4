//! Log setup. Records from job threads carry the job's identity so interleaved output stays
//! attributable.

use colored::{ColoredString, Colorize};
use env_logger::{Builder, Env};
use log::{Level, LevelFilter};
use std::io::Write;

use crate::utils::config::PackagePaths;

/// Job threads are named `<prefix><identity>`.
pub const JOB_THREAD_PREFIX: &str = "load-";

/// `LEAFLOAD_LOG` replaces the default filter; `LEAFLOAD_LOG_STYLE` controls color.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let paths = PackagePaths::get();
    let env = Env::new()
        .filter(format!("{}LOG", paths.env_prefix()))
        .write_style(format!("{}LOG_STYLE", paths.env_prefix()));

    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Warn) // dependencies
        .filter_module(paths.pkg_name(), level)
        .parse_env(env)
        .format(|buf, record| {
            let thread = std::thread::current();
            let line = format_line(
                record.level(),
                record.target(),
                job_tag(thread.name()),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        });
    let _ = builder.try_init();
}

/// Identity of the job a thread runs, if it is a job thread.
pub fn job_tag(thread_name: Option<&str>) -> Option<&str> {
    thread_name
        .and_then(|name| name.strip_prefix(JOB_THREAD_PREFIX))
        .filter(|tag| !tag.is_empty())
}

/// One log line: `[leafload <job>] msg`, with level and target added for warnings and errors.
pub fn format_line(level: Level, target: &str, job: Option<&str>, msg: &str) -> String {
    let name = PackagePaths::get().pkg_name().cyan();
    let tag = job.map(|j| format!(" {}", j.magenta())).unwrap_or_default();
    match level {
        Level::Error => format!("[{}{} {} {}] {}", name, tag, "ERROR".red(), target.white(), msg),
        Level::Warn => format!("[{}{} {} {}] {}", name, tag, "WARN".yellow(), target.white(), msg),
        Level::Debug | Level::Trace => format!("[{}{}] {}", name, tag, msg.dimmed()),
        Level::Info => format!("[{}{}] {}", name, tag, msg),
    }
}

/// Colors for run summaries.
pub struct Colors;

impl Colors {
    pub const SUCCEEDED: &'static str = "green";
    pub const FAILED: &'static str = "red";

    pub fn colorize(color: &str, text: &str) -> ColoredString {
        text.color(color)
    }
}
