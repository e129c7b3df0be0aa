// src/types.rs

use serde::Deserialize;

/// The recognized filesystem change kinds.
///
/// Raw watcher events that do not map onto one of these five kinds
/// (access notifications, metadata-only churn) are dropped before they
/// reach the change batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    DirAdded,
    DirRemoved,
}

impl ChangeKind {
    /// The default subscription: file-level changes only.
    pub const DEFAULT_SUBSCRIPTION: [ChangeKind; 3] =
        [ChangeKind::Added, ChangeKind::Modified, ChangeKind::Removed];

    /// Human-readable label used in the change log.
    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Added => "File added",
            ChangeKind::Modified => "File updated",
            ChangeKind::Removed => "File removed",
            ChangeKind::DirAdded => "Directory added",
            ChangeKind::DirRemoved => "Directory removed",
        }
    }
}

/// The `task` field of the configuration: a single task identifier or
/// an ordered list of identifiers.
///
/// ```toml
/// task = "build"
/// # or
/// task = ["build", "deploy"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    One(String),
    Many(Vec<String>),
}

impl Default for TaskRef {
    fn default() -> Self {
        TaskRef::Many(Vec::new())
    }
}

impl TaskRef {
    /// Normalize to an ordered sequence; a single task becomes a
    /// one-element sequence. Blank identifiers are kept here and
    /// rejected by validation.
    pub fn as_sequence(&self) -> Vec<String> {
        match self {
            TaskRef::One(name) => vec![name.clone()],
            TaskRef::Many(names) => names.clone(),
        }
    }

    /// True if the reference names no runnable task at all.
    pub fn is_empty(&self) -> bool {
        match self {
            TaskRef::One(name) => name.trim().is_empty(),
            TaskRef::Many(names) => {
                names.is_empty() || names.iter().all(|n| n.trim().is_empty())
            }
        }
    }
}
