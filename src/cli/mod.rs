//! Command-line interface module.

mod args;
pub mod check;
pub mod serve;
pub mod sidebar;

pub use args::{CheckArgs, Cli, Commands, ServeArgs, SidebarArgs};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::ensure_dir;
use crate::utils::path::normalize_path;

/// Resolve the documents root argument to an existing directory.
pub(crate) fn resolve_root(path: &Path) -> Result<PathBuf> {
    let root = normalize_path(path);
    ensure_dir(&root).with_context(|| format!("invalid documents root `{}`", path.display()))?;
    Ok(root)
}
