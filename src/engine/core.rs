// src/engine/core.rs

//! Pure batching/debounce core.
//!
//! This is a synchronous, deterministic state holder: it owns the
//! change batch and decides, per recorded change, whether the shell
//! should flush immediately or (re-)arm the trailing-edge timer. It
//! has no channels, no Tokio types, and performs no IO, so it can be
//! tested exhaustively without a runtime.

use std::mem;
use std::time::Duration;

use crate::engine::ChangeEvent;
use crate::logging::highlight_path;

/// The accumulated, not-yet-flushed change events.
///
/// Append-only between flushes; taken atomically (swapped with an
/// empty batch) at flush time, so no event is dropped or duplicated
/// across a flush boundary and arrival order is preserved.
#[derive(Debug, Default)]
pub struct ChangeBatch {
    changes: Vec<ChangeEvent>,
}

impl ChangeBatch {
    pub fn push(&mut self, change: ChangeEvent) {
        self.changes.push(change);
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.changes.iter()
    }

    pub fn into_changes(self) -> Vec<ChangeEvent> {
        self.changes
    }
}

/// What the shell should do after recording a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceStep {
    /// No debounce window configured: flush right away.
    FlushNow,
    /// Reset the trailing-edge timer to this delay; flush fires only
    /// after that much silence.
    ArmTimer(Duration),
}

/// Debounce state: the live batch plus the configured window.
#[derive(Debug)]
pub struct DebounceCore {
    delay: Duration,
    batch: ChangeBatch,
}

impl DebounceCore {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            batch: ChangeBatch::default(),
        }
    }

    /// Append a change to the live batch and return the debounce
    /// decision for the shell.
    pub fn record(&mut self, change: ChangeEvent) -> DebounceStep {
        self.batch.push(change);
        if self.delay.is_zero() {
            DebounceStep::FlushNow
        } else {
            DebounceStep::ArmTimer(self.delay)
        }
    }

    /// Atomically take the accumulated batch, leaving an empty one.
    pub fn take_batch(&mut self) -> ChangeBatch {
        mem::take(&mut self.batch)
    }

    /// Number of changes waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.batch.len()
    }
}

/// Render one change-log line: `"<Label>: <highlighted path>"`.
pub fn format_change(change: &ChangeEvent) -> String {
    format!("{}: {}", change.kind.label(), highlight_path(&change.path))
}
