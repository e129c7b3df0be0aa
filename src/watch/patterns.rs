// src/watch/patterns.rs

use std::fmt;
use std::path::{Component, Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::errors::{Result, WatchrunError};

/// One filesystem location the watcher must subscribe to in order to
/// cover the configured patterns. `path` is relative to the project
/// root (`.` for the root itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchRoot {
    pub path: PathBuf,
    pub recursive: bool,
}

/// Compiled form of the `files` configuration: a glob set for matching
/// changed paths plus the derived subscription roots.
///
/// Paths handed to [`WatchSet::is_match`] are expected to be relative
/// to the project root, with forward slashes, as produced by the
/// watcher's relativization.
#[derive(Clone)]
pub struct WatchSet {
    globs: GlobSet,
    roots: Vec<WatchRoot>,
}

impl fmt::Debug for WatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSet")
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl WatchSet {
    /// Compile `files` entries (paths or globs) into a watch set.
    ///
    /// - A literal entry naming an existing directory also matches
    ///   everything beneath it.
    /// - A glob entry contributes its literal prefix as a recursive
    ///   watch root (`src/**/*.rs` -> `src`, `*.txt` -> `.`).
    /// - A literal file entry contributes its parent directory,
    ///   non-recursively, so later creation of the file is observed.
    pub fn compile(files: &[String], root_dir: &Path) -> Result<WatchSet> {
        let mut builder = GlobSetBuilder::new();
        let mut roots: Vec<WatchRoot> = Vec::new();

        for pattern in files.iter().filter(|f| !f.trim().is_empty()) {
            let pattern = pattern.trim_end_matches('/');
            add_glob(&mut builder, pattern)?;

            if !has_glob_meta(pattern) && root_dir.join(pattern).is_dir() {
                // Directory shorthand: match the directory's contents too.
                add_glob(&mut builder, &format!("{pattern}/**"))?;
                roots.push(WatchRoot {
                    path: PathBuf::from(pattern),
                    recursive: true,
                });
            } else if has_glob_meta(pattern) {
                roots.push(WatchRoot {
                    path: literal_prefix(pattern),
                    recursive: true,
                });
            } else {
                let parent = Path::new(pattern)
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                roots.push(WatchRoot {
                    path: parent,
                    recursive: false,
                });
            }
        }

        let globs = builder.build().map_err(|e| {
            WatchrunError::config(format!("building glob set for `files`: {e}"))
        })?;

        Ok(WatchSet {
            globs,
            roots: dedupe_roots(roots),
        })
    }

    /// Returns true if a changed path (relative to the project root)
    /// is covered by the configured patterns.
    pub fn is_match(&self, rel_path: &str) -> bool {
        self.globs.is_match(rel_path)
    }

    /// The subscription roots the watcher should register.
    pub fn roots(&self) -> &[WatchRoot] {
        &self.roots
    }
}

fn add_glob(builder: &mut GlobSetBuilder, pattern: &str) -> Result<()> {
    let glob = Glob::new(pattern).map_err(|e| {
        WatchrunError::config(format!("invalid glob pattern '{pattern}': {e}"))
    })?;
    builder.add(glob);
    Ok(())
}

fn has_glob_meta(pattern: &str) -> bool {
    pattern.chars().any(|c| matches!(c, '*' | '?' | '[' | ']' | '{' | '}'))
}

/// Path components of a glob pattern up to (excluding) the first
/// component containing a metacharacter. `src/**/*.rs` -> `src`;
/// `*.txt` -> `.`.
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::new();
    for component in Path::new(pattern).components() {
        match component {
            Component::Normal(part) if !has_glob_meta(&part.to_string_lossy()) => {
                prefix.push(part);
            }
            Component::Normal(_) => break,
            other => prefix.push(other),
        }
    }
    if prefix.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        prefix
    }
}

/// Drop roots already covered by a recursive ancestor, and exact
/// duplicates, so no location is subscribed twice.
fn dedupe_roots(mut roots: Vec<WatchRoot>) -> Vec<WatchRoot> {
    roots.sort_by(|a, b| a.path.cmp(&b.path).then(b.recursive.cmp(&a.recursive)));
    roots.dedup();

    let mut kept: Vec<WatchRoot> = Vec::with_capacity(roots.len());
    for root in roots {
        if kept.iter().any(|k| covers(k, &root)) {
            continue;
        }
        kept.retain(|k| !covers(&root, k));
        kept.push(root);
    }
    kept
}

/// True if subscribing `outer` makes a subscription at `inner` redundant.
/// A recursive `.` root covers the whole project.
fn covers(outer: &WatchRoot, inner: &WatchRoot) -> bool {
    outer.recursive
        && (outer.path.as_os_str() == "."
            || inner.path == outer.path
            || inner.path.starts_with(&outer.path))
}
