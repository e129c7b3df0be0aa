// src/exec/backend.rs

//! Pluggable task-runner abstraction.
//!
//! The runtime talks to a `TaskRunner` instead of spawning processes
//! directly. Production code uses [`CommandRunner`]; tests provide
//! their own implementation that records invocations and simulates
//! failures.
//!
//! [`CommandRunner`]: super::command::CommandRunner

use std::future::Future;
use std::pin::Pin;

use crate::config::ResolvedTask;
use crate::errors::Result;

/// Trait abstracting how a resolved task is executed.
///
/// Completion is the resolution of the returned future; the runtime
/// awaits it before dispatching the next task of a sequence, which is
/// what makes sequences strictly sequential regardless of the
/// implementation.
pub trait TaskRunner: Send {
    /// Run one task to completion. An `Err` aborts the remainder of
    /// the current sequence.
    fn run(
        &mut self,
        task: ResolvedTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
