// src/engine/mod.rs

//! Orchestration engine for watchrun.
//!
//! This module ties together:
//! - the change batch and trailing-edge debounce decisions
//! - the main runtime event loop that reacts to:
//!   - classified filesystem changes
//!   - watch-primitive errors
//!   - shutdown signals
//!
//! The pure core lives in [`core`]; the async/IO shell is implemented
//! in [`runtime`].

use std::path::PathBuf;

use crate::errors::WatchrunError;
use crate::types::ChangeKind;

/// One filesystem notification: kind + path (relative to the project
/// root). Created when the watcher reports a recognized change,
/// consumed when its batch is flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

/// Events flowing into the runtime from the watcher, the Ctrl-C
/// handler, or an embedding caller.
#[derive(Debug)]
pub enum OrchestratorEvent {
    /// A recognized change was observed.
    FileChanged(ChangeEvent),
    /// The watch primitive reported an error. Logged; the subscription
    /// keeps running.
    WatchFailed(WatchrunError),
    /// Graceful shutdown: cancel any pending debounce timer, discard
    /// the unflushed batch, and stop.
    ShutdownRequested,
}

pub mod core;
pub mod runtime;

pub use self::core::{format_change, ChangeBatch, DebounceCore, DebounceStep};
pub use self::runtime::Runtime;
