// tests/watch_files.rs

//! Integration tests against the real filesystem watcher.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

use watchrun::config::WatchOptions;
use watchrun::engine::{ChangeEvent, OrchestratorEvent};
use watchrun::types::ChangeKind;
use watchrun::watch::{spawn_watcher, WatchSet};
use watchrun_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

async fn next_change(
    rx: &mut mpsc::Receiver<OrchestratorEvent>,
) -> Result<ChangeEvent, Box<dyn Error>> {
    loop {
        let event = timeout(Duration::from_secs(5), rx.recv())
            .await?
            .ok_or("watcher channel closed")?;
        match event {
            OrchestratorEvent::FileChanged(change) => return Ok(change),
            // Backend hiccups are non-fatal; keep waiting.
            OrchestratorEvent::WatchFailed(_) => continue,
            other => return Err(format!("unexpected event: {other:?}").into()),
        }
    }
}

#[tokio::test]
async fn file_creation_is_forwarded_with_a_relative_path() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("src"))?;

    let set = WatchSet::compile(&["src/**/*.rs".to_string()], dir.path())?;
    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = spawn_watcher(
        dir.path().to_path_buf(),
        set,
        ChangeKind::DEFAULT_SUBSCRIPTION.to_vec(),
        &WatchOptions::default(),
        tx,
    )?;

    // Let the backend arm before producing events.
    sleep(Duration::from_millis(250)).await;
    fs::write(dir.path().join("src/lib.rs"), "pub fn touched() {}\n")?;

    let change = next_change(&mut rx).await?;
    assert_eq!(change.path, PathBuf::from("src/lib.rs"));
    assert!(
        matches!(change.kind, ChangeKind::Added | ChangeKind::Modified),
        "got {:?}",
        change.kind
    );

    Ok(())
}

#[tokio::test]
async fn paths_outside_the_patterns_are_filtered_out() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("src"))?;

    let set = WatchSet::compile(&["src/**/*.rs".to_string()], dir.path())?;
    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = spawn_watcher(
        dir.path().to_path_buf(),
        set,
        ChangeKind::DEFAULT_SUBSCRIPTION.to_vec(),
        &WatchOptions::default(),
        tx,
    )?;

    sleep(Duration::from_millis(250)).await;
    // The .txt write must never surface; the .rs write after it must.
    fs::write(dir.path().join("src/notes.txt"), "ignored")?;
    sleep(Duration::from_millis(250)).await;
    fs::write(dir.path().join("src/lib.rs"), "pub fn touched() {}\n")?;

    let change = next_change(&mut rx).await?;
    assert_eq!(change.path, PathBuf::from("src/lib.rs"));

    Ok(())
}

#[tokio::test]
async fn unsubscribed_kinds_are_dropped() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    fs::create_dir(dir.path().join("src"))?;
    fs::write(dir.path().join("src/lib.rs"), "old")?;

    // Only removals are subscribed; the modify below must not surface.
    let set = WatchSet::compile(&["src/**".to_string()], dir.path())?;
    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = spawn_watcher(
        dir.path().to_path_buf(),
        set,
        vec![ChangeKind::Removed],
        &WatchOptions::default(),
        tx,
    )?;

    sleep(Duration::from_millis(250)).await;
    fs::write(dir.path().join("src/lib.rs"), "new contents")?;
    sleep(Duration::from_millis(250)).await;
    fs::remove_file(dir.path().join("src/lib.rs"))?;

    let change = next_change(&mut rx).await?;
    assert_eq!(change.kind, ChangeKind::Removed);
    assert_eq!(change.path, PathBuf::from("src/lib.rs"));

    Ok(())
}
