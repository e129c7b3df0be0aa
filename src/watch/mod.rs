// src/watch/mod.rs

//! File watching and change classification.
//!
//! This module is responsible for:
//! - Compiling the configured `files` paths/globs into a watch set.
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Classifying raw watcher events into the recognized change kinds.
//!
//! It does **not** debounce or run tasks; it only turns filesystem
//! notifications into orchestrator events.

pub mod events;
pub mod patterns;
pub mod watcher;

pub use patterns::{WatchRoot, WatchSet};
pub use watcher::{spawn_watcher, WatcherHandle};
