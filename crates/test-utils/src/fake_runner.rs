use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use watchrun::config::ResolvedTask;
use watchrun::errors::{Result, WatchrunError};
use watchrun::exec::TaskRunner;

/// A fake task runner that:
/// - records `begin <name>` / `end <name>` markers for each task it runs
/// - can be told to fail specific tasks by name (with exit code 1).
///
/// The begin/end pairs make sequencing observable: with strictly
/// sequential dispatch the marker list never interleaves.
pub struct FakeRunner {
    log: Arc<Mutex<Vec<String>>>,
    fail: Vec<String>,
}

impl FakeRunner {
    pub fn new(log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            log,
            fail: Vec::new(),
        }
    }

    /// Make the runner report failure for the given task name.
    pub fn fail_on(mut self, name: &str) -> Self {
        self.fail.push(name.to_string());
        self
    }
}

/// Count how many times a task was started.
pub fn runs_of(log: &[String], name: &str) -> usize {
    let marker = format!("begin {name}");
    log.iter().filter(|entry| **entry == marker).count()
}

impl TaskRunner for FakeRunner {
    fn run(
        &mut self,
        task: ResolvedTask,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let log = Arc::clone(&self.log);
        let should_fail = self.fail.contains(&task.name);

        Box::pin(async move {
            log.lock().unwrap().push(format!("begin {}", task.name));
            // Concurrent dispatch would interleave the markers here.
            tokio::task::yield_now().await;
            log.lock().unwrap().push(format!("end {}", task.name));

            if should_fail {
                Err(WatchrunError::TaskFailed {
                    name: task.name,
                    code: 1,
                })
            } else {
                Ok(())
            }
        })
    }
}
