//! Staging mirror on disk.
//!
//! A private copy of the live tree under the system temp directory. Missing
//! entry points are synthesized so every directory renders, and derived
//! artifacts live under [`PREVIEW_DIR`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use serde::Serialize;
use thiserror::Error;

use crate::config::DocsConfig;
use crate::core::{INDEX_FILE, PREVIEW_DIR, ScanError, is_ignored, scan_dir, title_case};
use crate::sidebar::SidebarItem;

const STAGING_PREFIX: &str = "docket-";
const ROOT_HEADING: &str = "Documentation";
const ROOT_MARKER: &str = "<FullContents />";
const SUBDIR_MARKER: &str = "<SubPages />";

pub const SIDEBAR_ARTIFACT: &str = "sidebar.json";
pub const CONFIG_ARTIFACT: &str = "config.json";

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("IO error at `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("failed to walk `{0}`")]
    Walk(PathBuf, #[source] jwalk::Error),

    #[error("failed to encode `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> MirrorError + '_ {
    move |e| MirrorError::Io(path.to_path_buf(), e)
}

/// Create a fresh, uniquely named staging directory.
pub fn create_staging() -> Result<PathBuf, MirrorError> {
    let temp = std::env::temp_dir();
    let dir = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .rand_bytes(8)
        .tempdir()
        .map_err(io_err(&temp))?;
    Ok(dir.keep())
}

/// Remove a staging directory. Safe to call more than once.
pub fn remove_staging(staging: &Path) {
    match fs::remove_dir_all(staging) {
        Ok(()) => crate::debug!("mirror"; "removed {}", staging.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            crate::log!("warn"; "could not clean up {}: {}", staging.display(), e);
        }
    }
}

/// Copy the non-ignored contents of `src` into `dst`. Returns files copied.
///
/// Symlinks are followed. Entries that cannot be read or copied (dangling
/// links, permission errors) are skipped with a warning; only failing to
/// create `dst` itself is an error.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize, MirrorError> {
    fs::create_dir_all(dst).map_err(io_err(dst))?;
    let mut copied = 0;

    let walker = WalkDir::new(src)
        .skip_hidden(false)
        .follow_links(true)
        .sort(true)
        .process_read_dir(|_, _, _, children| {
            children.retain(|entry| {
                entry
                    .as_ref()
                    .map(|e| !is_ignored(&e.file_name.to_string_lossy()))
                    .unwrap_or(true)
            });
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let e = MirrorError::Walk(src.to_path_buf(), e);
                crate::log!("warn"; "skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        let Ok(rel) = path.strip_prefix(src) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }

        let target = dst.join(rel);
        let result = match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => fs::create_dir_all(&target)
                .map(|()| 0)
                .map_err(io_err(&target)),
            Ok(_) => copy_file(&path, &target).map(|()| 1),
            Err(e) => Err(MirrorError::Io(path.clone(), e)),
        };
        match result {
            Ok(n) => copied += n,
            Err(e) => crate::log!("warn"; "skipping {}: {}", rel.display(), e),
        }
    }

    Ok(copied)
}

/// Copy one file, creating missing parent directories.
pub fn copy_file(src: &Path, dst: &Path) -> Result<(), MirrorError> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(io_err(parent))?;
    }
    fs::copy(src, dst).map_err(io_err(src))?;
    Ok(())
}

/// Remove one file if present.
pub fn remove_file(path: &Path) -> Result<(), MirrorError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(MirrorError::Io(path.to_path_buf(), e)),
        _ => Ok(()),
    }
}

/// Remove a directory subtree if present.
pub fn remove_tree(path: &Path) -> Result<(), MirrorError> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(MirrorError::Io(path.to_path_buf(), e)),
        _ => Ok(()),
    }
}

/// Write an entry point into every directory below `dir` that lacks one.
///
/// `is_root` selects the heading and listing marker for `dir` itself;
/// subdirectories always get the child-listing marker. Returns files written.
pub fn synthesize_entry_points(dir: &Path, is_root: bool) -> Result<usize, MirrorError> {
    let entries = scan_dir(dir)?;
    let mut written = 0;

    if !entries.iter().any(|e| !e.is_dir() && e.name == INDEX_FILE) {
        let heading = match dir.file_name() {
            Some(name) if !is_root => title_case(&name.to_string_lossy()),
            _ => ROOT_HEADING.to_string(),
        };
        let marker = if is_root { ROOT_MARKER } else { SUBDIR_MARKER };
        let index = dir.join(INDEX_FILE);
        fs::write(&index, format!("# {heading}\n\n{marker}\n")).map_err(io_err(&index))?;
        written += 1;
    }

    for entry in entries.iter().filter(|e| e.is_dir()) {
        written += synthesize_entry_points(&dir.join(&entry.name), false)?;
    }

    Ok(written)
}

/// Effective configuration with the compiled navigation embedded.
#[derive(Serialize)]
struct PreviewConfig<'a> {
    #[serde(flatten)]
    config: &'a DocsConfig,
    nav: &'a [SidebarItem],
}

/// Write the derived artifacts under `<staging>/.preview/`.
pub fn write_artifacts(
    staging: &Path,
    config: &DocsConfig,
    sidebar: &[SidebarItem],
) -> Result<(), MirrorError> {
    let dir = staging.join(PREVIEW_DIR);
    fs::create_dir_all(&dir).map_err(io_err(&dir))?;

    write_json(&dir.join(SIDEBAR_ARTIFACT), &sidebar)?;
    write_json(
        &dir.join(CONFIG_ARTIFACT),
        &PreviewConfig {
            config,
            nav: sidebar,
        },
    )
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), MirrorError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| MirrorError::Json(path.to_path_buf(), e))?;
    fs::write(path, json).map_err(io_err(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_tree_skips_ignored() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("guide")).unwrap();
        fs::create_dir_all(src.path().join("node_modules/pkg")).unwrap();
        fs::write(src.path().join("guide/setup.md"), "# Setup").unwrap();
        fs::write(src.path().join("node_modules/pkg/readme.md"), "").unwrap();
        fs::write(src.path().join(".docket"), "{}").unwrap();

        let copied = copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(dst.path().join("guide/setup.md").is_file());
        assert!(dst.path().join(".docket").is_file());
        assert!(!dst.path().join("node_modules").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_follows_symlinked_dir() {
        let src = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(shared.path().join("common.md"), "# Common").unwrap();
        std::os::unix::fs::symlink(shared.path(), src.path().join("shared")).unwrap();
        fs::write(src.path().join("intro.md"), "# Intro").unwrap();

        let copied = copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(dst.path().join("shared").is_dir());
        assert_eq!(
            fs::read_to_string(dst.path().join("shared/common.md")).unwrap(),
            "# Common"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_skips_dangling_symlink() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        std::os::unix::fs::symlink(src.path().join("gone.md"), src.path().join("old.md")).unwrap();
        fs::write(src.path().join("intro.md"), "# Intro").unwrap();

        let copied = copy_tree(src.path(), dst.path()).unwrap();
        assert_eq!(copied, 1);
        assert!(dst.path().join("intro.md").is_file());
        assert!(!dst.path().join("old.md").exists());
    }

    #[test]
    fn test_synthesize_entry_points() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("getting-started/deep")).unwrap();
        fs::create_dir_all(root.join("api")).unwrap();
        fs::write(root.join("api/index.md"), "# Mine").unwrap();

        let written = synthesize_entry_points(root, true).unwrap();
        assert_eq!(written, 3);

        let root_index = fs::read_to_string(root.join("index.md")).unwrap();
        assert_eq!(root_index, "# Documentation\n\n<FullContents />\n");
        let sub = fs::read_to_string(root.join("getting-started/index.md")).unwrap();
        assert_eq!(sub, "# Getting Started\n\n<SubPages />\n");
        assert!(root.join("getting-started/deep/index.md").is_file());
        assert_eq!(fs::read_to_string(root.join("api/index.md")).unwrap(), "# Mine");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("gone.md");
        assert!(remove_file(&file).is_ok());
        assert!(remove_tree(&temp.path().join("gone")).is_ok());

        let staging = create_staging().unwrap();
        assert!(staging.is_dir());
        remove_staging(&staging);
        remove_staging(&staging);
        assert!(!staging.exists());
    }

    #[test]
    fn test_write_artifacts() {
        let temp = TempDir::new().unwrap();
        let config = DocsConfig::default();
        let sidebar = vec![SidebarItem {
            text: "Intro".into(),
            link: Some("/intro".into()),
            collapsed: None,
            items: None,
        }];

        write_artifacts(temp.path(), &config, &sidebar).unwrap();

        let dir = temp.path().join(PREVIEW_DIR);
        let nav: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(SIDEBAR_ARTIFACT)).unwrap()).unwrap();
        assert_eq!(nav[0]["link"], "/intro");

        let full: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(CONFIG_ARTIFACT)).unwrap()).unwrap();
        assert_eq!(full["nav"][0]["text"], "Intro");
        assert_eq!(full["search"], true);
    }
}
