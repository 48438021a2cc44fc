//! Staging mirror synchronization for preview sessions.
//!
//! ```text
//! notify → translate → WatchEvent → MirrorSynchronizer ─┬─ copy / delete (immediate)
//!                                                       └─ Debouncer → regenerate
//! ```
//!
//! Mirror side effects are applied as each event arrives. Navigation
//! regeneration is coalesced: a burst of qualifying events produces exactly
//! one regeneration, followed by a cooldown during which events still update
//! the mirror but do not schedule another one.

mod debouncer;
mod staging;
mod types;
mod watch;

#[cfg(test)]
mod tests;

pub use debouncer::{COOLDOWN_MS, DEBOUNCE_MS, RegenState, SyncTiming};
pub use staging::{CONFIG_ARTIFACT, MirrorError, SIDEBAR_ARTIFACT, remove_staging};
pub use types::{WatchEvent, WatchEventKind};
pub use watch::{run, translate};

use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use debouncer::Debouncer;

use crate::config::{CONFIG_FILE, DocsConfig};
use crate::core::{ensure_dir, is_ignored};
use crate::sidebar::{self, SidebarOptions};
use crate::utils::path::route::MD_SUFFIX;
use crate::utils::path::{normalize_path, relative_slash};

/// Keeps a staging copy of a live documents tree in sync.
pub struct MirrorSynchronizer {
    docs_root: PathBuf,
    staging: PathBuf,
    debouncer: Debouncer,
    options: SidebarOptions,
    regenerations: usize,
    torn_down: bool,
}

impl MirrorSynchronizer {
    /// Create the staging mirror for `docs_root` and populate it.
    pub fn start(docs_root: &Path, timing: SyncTiming) -> Result<Self, MirrorError> {
        let mut sync = Self::create(docs_root, timing)?;
        sync.populate()?;
        Ok(sync)
    }

    /// Create an empty staging directory for `docs_root`.
    ///
    /// The directory exists from here on, so it can be registered for
    /// signal-driven teardown before the (possibly slow) initial copy.
    pub fn create(docs_root: &Path, timing: SyncTiming) -> Result<Self, MirrorError> {
        ensure_dir(docs_root)?;
        let staging = staging::create_staging()?;

        Ok(Self {
            docs_root: normalize_path(docs_root),
            staging,
            debouncer: Debouncer::new(timing),
            options: SidebarOptions::default(),
            regenerations: 0,
            torn_down: false,
        })
    }

    /// Copy the tree, synthesize missing entry points and write the initial
    /// artifacts. On error the caller drops `self`, which tears staging down.
    pub fn populate(&mut self) -> Result<(), MirrorError> {
        let copied = staging::copy_tree(&self.docs_root, &self.staging)?;
        let synthesized = staging::synthesize_entry_points(&self.staging, true)?;
        self.write_artifacts()?;

        crate::debug!(
            "mirror";
            "staged {} files ({} entry points synthesized) at {}",
            copied,
            synthesized,
            self.staging.display()
        );
        Ok(())
    }

    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging
    }

    pub fn state(&self) -> RegenState {
        self.debouncer.state()
    }

    /// Number of completed regenerations since setup.
    pub fn regenerations(&self) -> usize {
        self.regenerations
    }

    /// Time until the next scheduled transition.
    pub fn sleep_duration(&self, now: Instant) -> Duration {
        self.debouncer.sleep_duration(now)
    }

    /// Staging counterpart of a live path.
    ///
    /// `None` for the root itself, paths outside the live tree, and paths
    /// inside ignored directories.
    pub fn staging_path(&self, live: &Path) -> Option<PathBuf> {
        let rel = live.strip_prefix(&self.docs_root).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        let ignored = rel.components().any(|c| match c {
            Component::Normal(name) => is_ignored(&name.to_string_lossy()),
            _ => true,
        });
        (!ignored).then(|| self.staging.join(rel))
    }

    /// Apply one event: mirror the change now, schedule regeneration if it
    /// can affect navigation.
    pub fn handle(&mut self, event: &WatchEvent) {
        let Some(target) = self.staging_path(&event.path) else {
            crate::debug!("mirror"; "ignoring {}", event.path.display());
            return;
        };

        let rel = relative_slash(&event.path, &self.docs_root);
        crate::debug!("mirror"; "{}: {}", event.kind.label(), rel);

        let result = match event.kind {
            WatchEventKind::Added | WatchEventKind::Changed => {
                staging::copy_file(&event.path, &target)
            }
            WatchEventKind::Deleted => staging::remove_file(&target),
            WatchEventKind::DeletedDir => staging::remove_tree(&target),
            WatchEventKind::AddedDir => staging::copy_tree(&event.path, &target)
                .and_then(|_| staging::synthesize_entry_points(&target, false))
                .map(|_| ()),
        };
        if let Err(e) = result {
            crate::logger::status_warning(&format!("failed to mirror {rel}: {e}"));
        }

        if Self::affects_navigation(event) && !self.debouncer.arm(event.at) {
            crate::debug!("mirror"; "regeneration gated ({})", self.state().label());
        }
    }

    /// Structural events always qualify; content changes only for
    /// documents and the configuration record.
    fn affects_navigation(event: &WatchEvent) -> bool {
        if event.kind.is_structural() {
            return true;
        }
        let name = event
            .path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        name.ends_with(MD_SUFFIX) || name == CONFIG_FILE
    }

    /// Advance the gate to `now`, regenerating if the debounce elapsed.
    /// Returns `true` if a regeneration ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.debouncer.take_if_ready(now) {
            return false;
        }

        match self.write_artifacts() {
            Ok(()) => crate::logger::status_success("navigation updated"),
            Err(e) => crate::logger::status_error("regeneration failed", &e.to_string()),
        }
        self.regenerations += 1;
        self.debouncer.finish(now);
        true
    }

    /// Recompute navigation from the staging tree and configuration from
    /// the live root, then write both artifacts.
    fn write_artifacts(&self) -> Result<(), MirrorError> {
        let config = DocsConfig::load(&self.docs_root);
        let options = self
            .options
            .with_collapse_folders(config.sidebar.collapse_folders);
        let nav = sidebar::compile_dir(&self.staging, &options)?;
        staging::write_artifacts(&self.staging, &config, &nav)
    }

    /// Remove the staging directory. Idempotent.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            self.torn_down = true;
            remove_staging(&self.staging);
        }
    }
}

impl Drop for MirrorSynchronizer {
    fn drop(&mut self) {
        self.teardown();
    }
}
