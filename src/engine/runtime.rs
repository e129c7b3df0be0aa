// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::config::ResolvedTask;
use crate::engine::core::{format_change, DebounceCore, DebounceStep};
use crate::engine::OrchestratorEvent;
use crate::errors::Result;
use crate::exec::TaskRunner;
use crate::logging::log_error;

/// The main orchestration runtime: an IO shell around [`DebounceCore`].
///
/// Responsibilities:
/// - Consume `OrchestratorEvent`s from the watcher / signal handler.
/// - Drive the trailing-edge debounce timer.
/// - On flush: log every change of the batch in arrival order, then
///   run the configured task sequence strictly sequentially through
///   the [`TaskRunner`].
///
/// The flush and its task sequence run inline in the loop, so at most
/// one flush is in flight at a time and task sequences never overlap.
/// Events arriving meanwhile queue in the channel and are batched when
/// the loop resumes.
pub struct Runtime<R: TaskRunner> {
    core: DebounceCore,
    tasks: Vec<ResolvedTask>,
    event_rx: mpsc::Receiver<OrchestratorEvent>,
    runner: R,
}

impl<R: TaskRunner> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl<R: TaskRunner> Runtime<R> {
    pub fn new(
        core: DebounceCore,
        tasks: Vec<ResolvedTask>,
        event_rx: mpsc::Receiver<OrchestratorEvent>,
        runner: R,
    ) -> Self {
        Self {
            core,
            tasks,
            event_rx,
            runner,
        }
    }

    /// Main event loop.
    ///
    /// Returns when a shutdown is requested or every event sender is
    /// gone. A pending debounce timer is cancelled on the way out and
    /// the unflushed batch discarded.
    pub async fn run(mut self) -> Result<()> {
        info!("watchrun runtime started");

        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                maybe = self.event_rx.recv() => {
                    match maybe {
                        None => {
                            info!("runtime event channel closed; exiting");
                            break;
                        }
                        Some(OrchestratorEvent::FileChanged(change)) => {
                            debug!(
                                kind = ?change.kind,
                                path = %change.path.display(),
                                "change recorded"
                            );
                            match self.core.record(change) {
                                DebounceStep::FlushNow => {
                                    deadline = None;
                                    self.flush().await;
                                }
                                DebounceStep::ArmTimer(delay) => {
                                    deadline = Some(Instant::now() + delay);
                                }
                            }
                        }
                        Some(OrchestratorEvent::WatchFailed(err)) => {
                            log_error(&err);
                        }
                        Some(OrchestratorEvent::ShutdownRequested) => {
                            info!("shutdown requested, stopping runtime");
                            break;
                        }
                    }
                }
                _ = maybe_sleep(deadline), if deadline.is_some() => {
                    deadline = None;
                    self.flush().await;
                }
            }
        }

        info!("watchrun runtime exiting");
        Ok(())
    }

    /// Take the accumulated batch, log it, and run the task sequence.
    async fn flush(&mut self) {
        let batch = self.core.take_batch();
        if batch.is_empty() {
            return;
        }
        debug!(changes = batch.len(), "flushing change batch");

        for change in batch.iter() {
            info!("{}", format_change(change));
        }

        self.run_sequence().await;
    }

    /// Run the configured tasks strictly sequentially: each task's
    /// completion is awaited before the next starts. The first failure
    /// is logged through the error funnel and aborts the remainder of
    /// the sequence; tasks that never ran are not reported.
    async fn run_sequence(&mut self) {
        for task in &self.tasks {
            debug!(task = %task.name, "dispatching task");
            if let Err(err) = self.runner.run(task.clone()).await {
                log_error(&err);
                break;
            }
        }
    }
}

/// Sleep until the given deadline; pends forever when there is none.
/// Only polled when the select branch is enabled.
async fn maybe_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
