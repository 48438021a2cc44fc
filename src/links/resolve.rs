//! Link target resolution against the documentation root.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::LinkReference;
use crate::core::INDEX_FILE;
use crate::utils::path::clean_path;
use crate::utils::path::route::MD_SUFFIX;

/// Outcome of resolving one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// First existing candidate.
    Resolved(PathBuf),
    Broken,
}

impl Resolution {
    #[inline]
    pub fn is_broken(&self) -> bool {
        matches!(self, Self::Broken)
    }
}

/// Resolves link targets to files under one documentation root.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    root: PathBuf,
}

impl LinkResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path a target points at, before any existence checks.
    ///
    /// `/x` is relative to the root, anything else to the source's directory.
    pub fn candidate(&self, source_file: &Path, target: &str) -> PathBuf {
        let joined = match target.strip_prefix('/') {
            Some(rooted) => self.root.join(rooted),
            None => source_file
                .parent()
                .unwrap_or(&self.root)
                .join(target),
        };
        clean_path(&joined)
    }

    /// Resolve a reference; first existing path wins:
    /// the candidate itself, candidate + `.md`, then `candidate/index.md`.
    pub fn resolve(&self, link: &LinkReference) -> Resolution {
        let candidate = self.candidate(&link.source_file, &link.raw_target);

        if candidate.exists() {
            return Resolution::Resolved(candidate);
        }

        if !candidate.as_os_str().to_string_lossy().ends_with(MD_SUFFIX) {
            let with_suffix = append_suffix(&candidate, MD_SUFFIX);
            if with_suffix.exists() {
                return Resolution::Resolved(with_suffix);
            }
        }

        let index = candidate.join(INDEX_FILE);
        if index.exists() {
            return Resolution::Resolved(index);
        }

        Resolution::Broken
    }
}

/// `a/guide` + `.md` -> `a/guide.md` (no extension replacement).
fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut os: OsString = path.as_os_str().to_owned();
    os.push(suffix);
    PathBuf::from(os)
}
