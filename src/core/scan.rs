//! Directory listing with the fixed ignore set.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// Directory names never scanned, copied or watched.
///
/// Dependency cache, version control metadata, prior build output,
/// prior staging output and the reserved preview-tooling directory.
pub const IGNORED_DIRS: [&str; 5] = ["node_modules", ".git", "dist", ".cache", PREVIEW_DIR];

/// Reserved directory that holds derived artifacts inside the staging tree.
pub const PREVIEW_DIR: &str = ".preview";

/// Entry-point document of a directory.
pub const INDEX_FILE: &str = "index.md";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("directory not found: `{0}`")]
    NotFound(PathBuf),

    #[error("path is not a directory: `{0}`")]
    NotADirectory(PathBuf),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
}

/// One immediate child of a scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::File }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: EntryKind::Dir }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Check whether a file or directory name belongs to the ignore set.
#[inline]
pub fn is_ignored(name: &str) -> bool {
    IGNORED_DIRS.contains(&name)
}

/// Check that `path` is an existing directory.
pub fn ensure_dir(path: &Path) -> Result<(), ScanError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ScanError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(ScanError::Io(path.to_path_buf(), e)),
    }
}

/// List the immediate entries of `dir`, sorted by name.
///
/// Ignored names are dropped. Symlinks are followed; entries whose metadata
/// cannot be read (dangling links) and names that are not valid UTF-8 are
/// skipped.
pub fn scan_dir(dir: &Path) -> Result<Vec<TreeEntry>, ScanError> {
    ensure_dir(dir)?;

    let read = fs::read_dir(dir).map_err(|e| ScanError::Io(dir.to_path_buf(), e))?;
    let mut entries = Vec::new();

    for entry in read {
        let entry = entry.map_err(|e| ScanError::Io(dir.to_path_buf(), e))?;
        let Ok(name) = entry.file_name().into_string() else {
            crate::debug!("scan"; "skip non-utf8 name in {}", dir.display());
            continue;
        };
        if is_ignored(&name) {
            continue;
        }
        let Ok(meta) = fs::metadata(entry.path()) else {
            crate::debug!("scan"; "skip unreadable entry: {}", entry.path().display());
            continue;
        };
        let kind = if meta.is_dir() { EntryKind::Dir } else { EntryKind::File };
        entries.push(TreeEntry { name, kind });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
