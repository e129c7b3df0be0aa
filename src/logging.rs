// src/logging.rs

//! Logging setup for `watchrun` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `WATCHRUN_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that command stdout can be used purely
//! for task output.

use std::path::Path;

use owo_colors::{OwoColorize, Stream};
use tracing::error;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;
use crate::errors::{Result, WatchrunError};

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => std::env::var("WATCHRUN_LOG")
            .ok()
            .and_then(|s| parse_level_str(&s))
            .unwrap_or(tracing::Level::INFO),
    };

    // Send logs to stderr; keep stdout free for task output.
    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Highlight a path for embedding in a log message. Styled only when
/// stderr supports color, so captured logs stay plain.
pub fn highlight_path(path: &Path) -> String {
    let display = path.display().to_string();
    display
        .if_supports_color(Stream::Stderr, |text| text.cyan())
        .to_string()
}

/// Single error funnel: watch-primitive errors and task-execution
/// errors both land here, rendered as-is with no extra wrapping.
pub fn log_error(err: &WatchrunError) {
    error!("{err}");
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
