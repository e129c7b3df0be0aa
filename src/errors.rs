// src/errors.rs

//! Crate-wide error type and `Result` alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchrunError {
    /// Invalid configuration, raised before any watch subscription exists.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The `task` field references a name with no `[tasks.<name>]` entry.
    #[error("Configuration error: unknown task '{0}'")]
    UnknownTask(String),

    /// A task process exited with a non-zero status.
    #[error("task '{name}' failed with exit code {code}")]
    TaskFailed { name: String, code: i32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatchrunError {
    /// Shorthand for [`WatchrunError::Config`].
    pub fn config(msg: impl Into<String>) -> Self {
        WatchrunError::Config(msg.into())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchrunError>;
