#![allow(dead_code)]

use std::collections::BTreeMap;

use watchrun::config::{ConfigFile, TaskConfig, WatchOptions};
use watchrun::types::{ChangeKind, TaskRef};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile {
                files: Vec::new(),
                task: TaskRef::default(),
                debounce: 0,
                events: None,
                options: WatchOptions::default(),
                tasks: BTreeMap::new(),
            },
        }
    }

    pub fn file(mut self, pattern: &str) -> Self {
        self.config.files.push(pattern.to_string());
        self
    }

    /// Append a task identifier to the `task` sequence.
    pub fn task(mut self, name: &str) -> Self {
        let mut sequence = self.config.task.as_sequence();
        sequence.push(name.to_string());
        self.config.task = TaskRef::Many(sequence);
        self
    }

    /// Set `task` to a single (non-list) reference.
    pub fn single_task(mut self, name: &str) -> Self {
        self.config.task = TaskRef::One(name.to_string());
        self
    }

    pub fn debounce(mut self, ms: u64) -> Self {
        self.config.debounce = ms;
        self
    }

    pub fn event(mut self, kind: ChangeKind) -> Self {
        self.config.events.get_or_insert_with(Vec::new).push(kind);
        self
    }

    /// Register a `[tasks.<name>]` entry.
    pub fn register(mut self, name: &str, cmd: &str) -> Self {
        self.config.tasks.insert(
            name.to_string(),
            TaskConfig {
                cmd: cmd.to_string(),
            },
        );
        self
    }

    pub fn build(self) -> ConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
