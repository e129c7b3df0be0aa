// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::WatchOptions;
use crate::engine::{ChangeEvent, OrchestratorEvent};
use crate::errors::Result;
use crate::types::ChangeKind;
use crate::watch::events::classify;
use crate::watch::patterns::WatchSet;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept
/// alive for as long as needed. Dropping this handle closes the watch
/// subscription.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Subscribe to the watch roots of `set` under `root` and forward
/// recognized changes into the orchestrator channel.
///
/// - `root` is the project root against which patterns are evaluated.
/// - `kinds` is the subscribed subset of change kinds; everything else
///   is dropped before it reaches the batch.
/// - `options` is the caller-supplied watcher configuration, passed
///   through to `notify`.
///
/// Watch errors (at subscription time and later) never tear the
/// subscription down; they are forwarded as events and logged by the
/// runtime's single error funnel.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    set: WatchSet,
    kinds: Vec<ChangeKind>,
    options: &WatchOptions,
    events_tx: mpsc::Sender<OrchestratorEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or_else(|_| root.clone()); // best-effort

    // Channel from the synchronous notify callback into the async world.
    let (raw_tx, mut raw_rx) =
        mpsc::unbounded_channel::<notify::Result<notify::Event>>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if raw_tx.send(res).is_err() {
                // Orchestrator is gone; nothing left to notify.
                eprintln!("watchrun: dropping watch event, orchestrator stopped");
            }
        },
        notify_config(options),
    )?;

    for watch_root in set.roots() {
        let abs = root.join(&watch_root.path);
        let mode = if watch_root.recursive && options.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        // A root that cannot be subscribed (e.g. not yet created) is an
        // async-class watch error: funneled to the error log, not fatal.
        if let Err(err) = watcher.watch(&abs, mode) {
            let _ = events_tx.try_send(OrchestratorEvent::WatchFailed(err.into()));
            continue;
        }
        debug!(path = ?abs, recursive = ?mode, "subscribed watch root");
    }

    // Async task that consumes raw events, classifies and filters them,
    // and forwards orchestrator events.
    tokio::spawn(async move {
        while let Some(res) = raw_rx.recv().await {
            match res {
                Ok(event) => {
                    debug!(?event, "received watch event");
                    for path in &event.paths {
                        let Some(kind) = classify(&event.kind, path) else {
                            continue;
                        };
                        if !kinds.contains(&kind) {
                            continue;
                        }
                        let Some(rel) = relative_str(&root, path) else {
                            warn!(
                                "could not relativize path {:?} against root {:?}",
                                path, root
                            );
                            continue;
                        };
                        if !set.is_match(&rel) {
                            continue;
                        }
                        let change = ChangeEvent {
                            kind,
                            path: PathBuf::from(rel),
                        };
                        if events_tx
                            .send(OrchestratorEvent::FileChanged(change))
                            .await
                            .is_err()
                        {
                            debug!("orchestrator channel closed; stopping watch forwarding");
                            return;
                        }
                    }
                }
                Err(err) => {
                    if events_tx
                        .send(OrchestratorEvent::WatchFailed(err.into()))
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
            }
        }
        debug!("watch forwarding loop ended");
    });

    info!("Watching for changes...");

    Ok(WatcherHandle { _inner: watcher })
}

fn notify_config(options: &WatchOptions) -> Config {
    let mut config = Config::default();
    if let Some(ms) = options.poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    config.with_compare_contents(options.compare_contents)
}

/// Relativize an event path against `root`, with forward slashes.
/// Falls back to canonicalizing both sides, which papers over symlinked
/// prefixes such as macOS `/var` vs `/private/var`.
fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }
    let root_canon = root.canonicalize().ok()?;
    let path_canon = path.canonicalize().ok()?;
    let rel = path_canon.strip_prefix(&root_canon).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}
