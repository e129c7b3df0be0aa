// src/exec/command.rs

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ResolvedTask;
use crate::errors::{Result, WatchrunError};
use crate::exec::backend::TaskRunner;

/// Real task runner: executes each task's `cmd` via the platform
/// shell and waits for it to exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl TaskRunner for CommandRunner {
    fn run(
        &mut self,
        task: ResolvedTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(run_command(task))
    }
}

/// Run a single task process to completion.
///
/// stdout/stderr are streamed into debug-level logs so OS buffers
/// never fill; a non-zero exit maps to [`WatchrunError::TaskFailed`]
/// carrying the task name and exit code.
async fn run_command(task: ResolvedTask) -> Result<()> {
    info!(task = %task.name, cmd = %task.cmd, "starting task process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&task.cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&task.cmd);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", task.name))?;

    if let Some(stdout) = child.stdout.take() {
        spawn_line_logger(task.name.clone(), "stdout", stdout);
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_line_logger(task.name.clone(), "stderr", stderr);
    }

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", task.name))?;

    let code = status.code().unwrap_or(-1);
    info!(
        task = %task.name,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if status.success() {
        Ok(())
    } else {
        Err(WatchrunError::TaskFailed {
            name: task.name,
            code,
        })
    }
}

fn spawn_line_logger<S>(task: String, stream: &'static str, source: S)
where
    S: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let reader = BufReader::new(source);
        let mut lines = reader.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debug!(task = %task, "{stream}: {line}");
        }
    });
}
