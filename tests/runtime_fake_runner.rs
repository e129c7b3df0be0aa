// tests/runtime_fake_runner.rs

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use watchrun::config::ResolvedTask;
use watchrun::engine::{ChangeEvent, DebounceCore, OrchestratorEvent, Runtime};
use watchrun::errors::WatchrunError;
use watchrun::types::ChangeKind;
use watchrun_test_utils::fake_runner::{runs_of, FakeRunner};
use watchrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn change(path: &str) -> OrchestratorEvent {
    OrchestratorEvent::FileChanged(ChangeEvent {
        kind: ChangeKind::Modified,
        path: path.into(),
    })
}

fn task(name: &str) -> ResolvedTask {
    ResolvedTask {
        name: name.to_string(),
        cmd: format!("echo {name}"),
    }
}

/// Seed the channel with `events` followed by a shutdown, then run the
/// runtime to completion under a timeout.
async fn run_runtime(
    tasks: Vec<ResolvedTask>,
    runner: FakeRunner,
    delay: Duration,
    events: Vec<OrchestratorEvent>,
) -> TestResult {
    let (tx, rx) = mpsc::channel::<OrchestratorEvent>(32);
    for event in events {
        tx.send(event).await?;
    }
    tx.send(OrchestratorEvent::ShutdownRequested).await?;

    let runtime = Runtime::new(DebounceCore::new(delay), tasks, rx, runner);
    timeout(Duration::from_secs(3), runtime.run()).await??;
    Ok(())
}

#[tokio::test]
async fn each_change_without_debounce_runs_the_task_once() -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner::new(Arc::clone(&log));

    run_runtime(
        vec![task("build")],
        runner,
        Duration::ZERO,
        vec![change("src/a.rs"), change("src/b.rs"), change("src/c.rs")],
    )
    .await?;

    let log = log.lock().unwrap();
    assert_eq!(runs_of(&log, "build"), 3);
    Ok(())
}

#[tokio::test]
async fn task_sequence_runs_strictly_in_order() -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner::new(Arc::clone(&log));

    run_runtime(
        vec![task("build"), task("deploy")],
        runner,
        Duration::ZERO,
        vec![change("src/main.rs")],
    )
    .await?;

    let log = log.lock().unwrap();
    assert_eq!(
        *log,
        vec![
            "begin build".to_string(),
            "end build".to_string(),
            "begin deploy".to_string(),
            "end deploy".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn failing_task_aborts_the_remainder_of_the_sequence() -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner::new(Arc::clone(&log)).fail_on("build");

    run_runtime(
        vec![task("build"), task("deploy")],
        runner,
        Duration::ZERO,
        vec![change("src/main.rs")],
    )
    .await?;

    let log = log.lock().unwrap();
    assert_eq!(runs_of(&log, "build"), 1);
    assert_eq!(runs_of(&log, "deploy"), 0, "deploy must not start after build fails");
    Ok(())
}

#[tokio::test]
async fn later_flushes_run_after_an_earlier_failure() -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner::new(Arc::clone(&log)).fail_on("build");

    run_runtime(
        vec![task("build"), task("deploy")],
        runner,
        Duration::ZERO,
        vec![change("src/a.rs"), change("src/b.rs")],
    )
    .await?;

    // Each flush starts its sequence from scratch; the failure only
    // aborted the remainder of its own sequence.
    let log = log.lock().unwrap();
    assert_eq!(runs_of(&log, "build"), 2);
    assert_eq!(runs_of(&log, "deploy"), 0);
    Ok(())
}

#[tokio::test]
async fn watch_error_does_not_stop_change_processing() -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner::new(Arc::clone(&log));

    run_runtime(
        vec![task("build")],
        runner,
        Duration::ZERO,
        vec![
            OrchestratorEvent::WatchFailed(WatchrunError::config(
                "watch backend failure",
            )),
            change("src/main.rs"),
        ],
    )
    .await?;

    let log = log.lock().unwrap();
    assert_eq!(runs_of(&log, "build"), 1);
    Ok(())
}

#[tokio::test]
async fn shutdown_discards_the_unflushed_batch() -> TestResult {
    init_tracing();

    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = FakeRunner::new(Arc::clone(&log));

    // Debounce long enough that the timer cannot fire before shutdown.
    run_runtime(
        vec![task("build")],
        runner,
        Duration::from_secs(30),
        vec![change("src/main.rs")],
    )
    .await?;

    let log = log.lock().unwrap();
    assert_eq!(runs_of(&log, "build"), 0);
    Ok(())
}
