// src/config/validate.rs

use globset::Glob;

use crate::config::model::ConfigFile;
use crate::errors::{Result, WatchrunError};

/// Run semantic validation against a loaded configuration.
///
/// All checks run synchronously, before any watch subscription is
/// created. This checks:
/// - `files` is present and non-empty
/// - `task` is present and non-empty
/// - every task identifier resolves to a `[tasks.<name>]` entry
/// - registered tasks have a non-empty `cmd`
/// - every `files` entry is a valid glob pattern
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_files(cfg)?;
    ensure_task(cfg)?;
    ensure_known_tasks(cfg)?;
    ensure_patterns(cfg)?;
    Ok(())
}

fn ensure_files(cfg: &ConfigFile) -> Result<()> {
    if cfg.files.is_empty() || cfg.files.iter().all(|f| f.trim().is_empty()) {
        return Err(WatchrunError::config("No files specified"));
    }
    Ok(())
}

fn ensure_task(cfg: &ConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(WatchrunError::config("No task specified"));
    }
    Ok(())
}

fn ensure_known_tasks(cfg: &ConfigFile) -> Result<()> {
    for name in cfg.task.as_sequence() {
        if name.trim().is_empty() {
            return Err(WatchrunError::config(
                "empty task identifier in `task` list",
            ));
        }
        match cfg.tasks.get(&name) {
            None => return Err(WatchrunError::UnknownTask(name)),
            Some(tc) if tc.cmd.trim().is_empty() => {
                return Err(WatchrunError::config(format!(
                    "task '{name}' has an empty `cmd`"
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

fn ensure_patterns(cfg: &ConfigFile) -> Result<()> {
    for pattern in cfg.files.iter().filter(|f| !f.trim().is_empty()) {
        Glob::new(pattern).map_err(|e| {
            WatchrunError::config(format!("invalid glob pattern '{pattern}': {e}"))
        })?;
    }
    Ok(())
}
