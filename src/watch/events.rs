// src/watch/events.rs

//! Classification of raw `notify` events into the recognized change
//! kinds.

use std::path::Path;

use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};

use crate::types::ChangeKind;

/// Map a raw watcher event kind onto one of the five recognized change
/// kinds, or `None` for events outside the table (access
/// notifications, metadata-only churn, directory content ticks).
///
/// `path` is consulted when the backend does not say whether the
/// subject is a file or a directory.
pub fn classify(kind: &EventKind, path: &Path) -> Option<ChangeKind> {
    match kind {
        EventKind::Create(CreateKind::Folder) => Some(ChangeKind::DirAdded),
        EventKind::Create(CreateKind::File) => Some(ChangeKind::Added),
        EventKind::Create(_) => Some(added_kind(path)),

        EventKind::Remove(RemoveKind::Folder) => Some(ChangeKind::DirRemoved),
        // The path is gone, so when the backend doesn't say, assume file.
        EventKind::Remove(_) => Some(ChangeKind::Removed),

        // Renames surface as adds/removes, matching how the change is
        // observed from the watched tree.
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            Some(ChangeKind::Removed)
        }
        EventKind::Modify(ModifyKind::Name(_)) => {
            if path.exists() {
                Some(added_kind(path))
            } else {
                Some(ChangeKind::Removed)
            }
        }

        EventKind::Modify(ModifyKind::Metadata(_)) => None,
        EventKind::Modify(_) => {
            if path.is_dir() {
                None
            } else {
                Some(ChangeKind::Modified)
            }
        }

        EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
    }
}

fn added_kind(path: &Path) -> ChangeKind {
    if path.is_dir() {
        ChangeKind::DirAdded
    } else {
        ChangeKind::Added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, DataChange, MetadataKind};

    #[test]
    fn explicit_kinds_map_directly() {
        let p = Path::new("does/not/exist");
        assert_eq!(
            classify(&EventKind::Create(CreateKind::File), p),
            Some(ChangeKind::Added)
        );
        assert_eq!(
            classify(&EventKind::Create(CreateKind::Folder), p),
            Some(ChangeKind::DirAdded)
        );
        assert_eq!(
            classify(&EventKind::Remove(RemoveKind::File), p),
            Some(ChangeKind::Removed)
        );
        assert_eq!(
            classify(&EventKind::Remove(RemoveKind::Folder), p),
            Some(ChangeKind::DirRemoved)
        );
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Data(DataChange::Content)), p),
            Some(ChangeKind::Modified)
        );
    }

    #[test]
    fn noise_is_dropped() {
        let p = Path::new("does/not/exist");
        assert_eq!(classify(&EventKind::Access(AccessKind::Any), p), None);
        assert_eq!(
            classify(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any)), p),
            None
        );
        assert_eq!(classify(&EventKind::Any, p), None);
        assert_eq!(classify(&EventKind::Other, p), None);
    }

    #[test]
    fn rename_from_is_a_removal() {
        let p = Path::new("does/not/exist");
        assert_eq!(
            classify(
                &EventKind::Modify(ModifyKind::Name(RenameMode::From)),
                p
            ),
            Some(ChangeKind::Removed)
        );
    }
}
