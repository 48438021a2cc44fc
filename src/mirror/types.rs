use std::path::PathBuf;
use std::time::Instant;

/// What happened in the live tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Added,
    Deleted,
    Changed,
    AddedDir,
    DeletedDir,
}

impl WatchEventKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Changed => "changed",
            Self::AddedDir => "added directory",
            Self::DeletedDir => "deleted directory",
        }
    }

    /// Adds and deletes of files or directories change the tree shape.
    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Changed)
    }
}

/// One change notification, consumed immediately by the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    /// Absolute path in the live tree.
    pub path: PathBuf,
    pub at: Instant,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>, at: Instant) -> Self {
        Self {
            kind,
            path: path.into(),
            at,
        }
    }
}
