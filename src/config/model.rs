// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Result, WatchrunError};
use crate::types::{ChangeKind, TaskRef};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// files = ["src/**/*.rs", "assets"]
/// task = ["build", "deploy"]
/// debounce = 200
/// events = ["added", "modified", "removed"]
///
/// [options]
/// recursive = true
///
/// [tasks.build]
/// cmd = "cargo build"
///
/// [tasks.deploy]
/// cmd = "./scripts/deploy.sh"
/// ```
///
/// `files` and `task` are required (enforced by validation); everything
/// else has a default.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    /// Paths or glob patterns to watch.
    #[serde(default)]
    pub files: Vec<String>,

    /// Task identifier (or ordered list of identifiers) to run on change.
    ///
    /// Each identifier must name a `[tasks.<name>]` entry.
    #[serde(default)]
    pub task: TaskRef,

    /// Trailing-edge debounce window in milliseconds. 0 = no debounce.
    #[serde(default)]
    pub debounce: u64,

    /// Change kinds to react to. Defaults to `added`, `modified`,
    /// `removed` when omitted.
    #[serde(default)]
    pub events: Option<Vec<ChangeKind>>,

    /// Pass-through options for the underlying filesystem watcher.
    #[serde(default)]
    pub options: WatchOptions,

    /// Task registry from `[tasks.<name>]`.
    #[serde(default)]
    pub tasks: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    /// The effective set of change kinds to listen for.
    pub fn subscribed_kinds(&self) -> Vec<ChangeKind> {
        match &self.events {
            Some(kinds) => kinds.clone(),
            None => ChangeKind::DEFAULT_SUBSCRIPTION.to_vec(),
        }
    }

    /// The debounce window as a [`Duration`].
    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce)
    }

    /// Resolve the `task` reference against the `[tasks.<name>]`
    /// registry, in order.
    ///
    /// Unknown identifiers surface here (and in validation) rather than
    /// at the first flush.
    pub fn resolved_tasks(&self) -> Result<Vec<ResolvedTask>> {
        self.task
            .as_sequence()
            .into_iter()
            .map(|name| {
                self.tasks
                    .get(&name)
                    .map(|tc| ResolvedTask {
                        name: name.clone(),
                        cmd: tc.cmd.clone(),
                    })
                    .ok_or(WatchrunError::UnknownTask(name))
            })
            .collect()
    }
}

/// `[options]` section: forwarded to the watch primitive.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchOptions {
    /// Watch directories recursively.
    #[serde(default = "default_recursive")]
    pub recursive: bool,

    /// Polling interval for poll-based backends, in milliseconds.
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,

    /// Compare file contents before reporting a modification
    /// (poll-based backends only).
    #[serde(default)]
    pub compare_contents: bool,
}

fn default_recursive() -> bool {
    true
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            recursive: default_recursive(),
            poll_interval_ms: None,
            compare_contents: false,
        }
    }
}

/// `[tasks.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Shell command to execute.
    pub cmd: String,
}

/// A task identifier resolved against the registry: what the runtime
/// hands to the task runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTask {
    pub name: String,
    pub cmd: String,
}
