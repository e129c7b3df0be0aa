// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod types;
pub mod watch;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::engine::core::DebounceCore;
use crate::engine::{OrchestratorEvent, Runtime};
use crate::errors::Result;
use crate::exec::CommandRunner;
use crate::watch::patterns::WatchSet;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading & validation
/// - watch-set compilation and task resolution
/// - the file watcher
/// - Ctrl-C handling
/// - the debounce/dispatch runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let root = config_root_dir(&config_path);
    let watch_set = WatchSet::compile(&cfg.files, &root)?;
    let tasks = cfg.resolved_tasks()?;

    let (events_tx, events_rx) = mpsc::channel::<OrchestratorEvent>(64);

    // Must stay alive for as long as the runtime runs; dropping the
    // handle closes the watch subscription.
    let _watcher = watch::spawn_watcher(
        root,
        watch_set,
        cfg.subscribed_kinds(),
        &cfg.options,
        events_tx.clone(),
    )?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = events_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(OrchestratorEvent::ShutdownRequested).await;
        });
    }

    let core = DebounceCore::new(cfg.debounce_delay());
    let runtime = Runtime::new(core, tasks, events_rx, CommandRunner::new());
    runtime.run().await
}

/// Figure out a sensible project root for watching.
///
/// - If the config path has a non-empty parent (e.g. "configs/Watchrun.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Watchrun.toml" (parent = ""),
///   we fall back to the current working directory.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("watchrun dry-run");
    println!("  files: {:?}", cfg.files);
    println!("  task: {:?}", cfg.task.as_sequence());
    println!("  debounce: {}ms", cfg.debounce);
    println!("  events: {:?}", cfg.subscribed_kinds());
    println!();

    println!("tasks ({}):", cfg.tasks.len());
    for (name, task) in cfg.tasks.iter() {
        println!("  - {name}");
        println!("      cmd: {}", task.cmd);
    }

    debug!("dry-run complete (no execution)");
}
