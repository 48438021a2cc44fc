//! Live-tree watcher.
//!
//! The `notify` callback thread feeds a std channel; a bridge thread forwards
//! into tokio so a single `select!` loop can interleave events, deadlines and
//! shutdown on one current-thread runtime.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use super::{MirrorSynchronizer, WatchEvent, WatchEventKind};
use crate::config::CONFIG_FILE;

/// Check if path is an editor temp/backup file
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    if name == CONFIG_FILE {
        return false;
    }
    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "swx" | "tmp")
        || name.ends_with('~')
        || name.starts_with(".#")
        || name == "4913"
}

/// Translate one raw notify event into mirror events.
///
/// Event kinds are reconciled with the live file system, since watchers
/// report stale kinds around atomic saves. Renames become delete + add.
pub fn translate(event: &notify::Event, sync: &MirrorSynchronizer, at: Instant) -> Vec<WatchEvent> {
    let mut out = Vec::new();

    match event.kind {
        EventKind::Create(kind) => {
            for path in &event.paths {
                let kind = match kind {
                    CreateKind::Folder => Some(WatchEventKind::AddedDir),
                    CreateKind::File => path.exists().then_some(WatchEventKind::Added),
                    _ => appeared(path),
                };
                push(&mut out, sync, kind, path, at);
            }
        }
        EventKind::Remove(kind) => {
            for path in &event.paths {
                let kind = match kind {
                    _ if path.exists() => reappeared(path),
                    RemoveKind::Folder => Some(WatchEventKind::DeletedDir),
                    RemoveKind::File => Some(WatchEventKind::Deleted),
                    _ => Some(vanished(path, sync)),
                };
                push(&mut out, sync, kind, path, at);
            }
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => {}
        EventKind::Modify(ModifyKind::Name(mode)) => match (mode, event.paths.as_slice()) {
            (RenameMode::Both, [from, to]) => {
                push(&mut out, sync, Some(vanished(from, sync)), from, at);
                push(&mut out, sync, appeared(to), to, at);
            }
            (RenameMode::From, _) => {
                for path in &event.paths {
                    push(&mut out, sync, Some(vanished(path, sync)), path, at);
                }
            }
            (RenameMode::To, _) => {
                for path in &event.paths {
                    push(&mut out, sync, appeared(path), path, at);
                }
            }
            _ => {
                for path in &event.paths {
                    let kind = if path.exists() {
                        appeared(path)
                    } else {
                        Some(vanished(path, sync))
                    };
                    push(&mut out, sync, kind, path, at);
                }
            }
        },
        EventKind::Modify(_) => {
            for path in &event.paths {
                let kind = if path.is_file() {
                    Some(WatchEventKind::Changed)
                } else if path.exists() {
                    // directory mtime noise
                    None
                } else {
                    Some(vanished(path, sync))
                };
                push(&mut out, sync, kind, path, at);
            }
        }
        EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
    }

    out
}

fn push(
    out: &mut Vec<WatchEvent>,
    sync: &MirrorSynchronizer,
    kind: Option<WatchEventKind>,
    path: &Path,
    at: Instant,
) {
    let Some(kind) = kind else {
        return;
    };
    if is_temp_file(path) || sync.staging_path(path).is_none() {
        return;
    }
    out.push(WatchEvent::new(kind, path, at));
}

/// Kind for a path that now exists in the live tree.
fn appeared(path: &Path) -> Option<WatchEventKind> {
    if path.is_dir() {
        Some(WatchEventKind::AddedDir)
    } else if path.is_file() {
        Some(WatchEventKind::Added)
    } else {
        None
    }
}

/// A removal reported for a path that still exists: an atomic save.
fn reappeared(path: &Path) -> Option<WatchEventKind> {
    path.is_file().then_some(WatchEventKind::Changed)
}

/// Kind for a path that is gone; the mirror remembers what it was.
fn vanished(path: &Path, sync: &MirrorSynchronizer) -> WatchEventKind {
    match sync.staging_path(path) {
        Some(staged) if staged.is_dir() => WatchEventKind::DeletedDir,
        _ => WatchEventKind::Deleted,
    }
}

/// Watch the live tree until `shutdown_rx` fires, then tear the mirror down.
pub fn run(mut sync: MirrorSynchronizer, shutdown_rx: mpsc::UnboundedReceiver<()>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start watch runtime")?;

    let result = runtime.block_on(watch_loop(&mut sync, shutdown_rx));
    sync.teardown();
    result
}

async fn watch_loop(
    sync: &mut MirrorSynchronizer,
    mut shutdown_rx: mpsc::UnboundedReceiver<()>,
) -> Result<()> {
    // Watcher first: events buffer in the channel from here on
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })
    .context("failed to create file watcher")?;
    watcher
        .watch(sync.docs_root(), RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", sync.docs_root().display()))?;

    let (async_tx, mut async_rx) = mpsc::channel::<notify::Event>(64);

    std::thread::spawn(move || {
        while let Ok(result) = notify_rx.recv() {
            match result {
                Ok(event) => {
                    if async_tx.blocking_send(event).is_err() {
                        break; // Receiver dropped
                    }
                }
                Err(e) => crate::log!("watch"; "notify error: {}", e),
            }
        }
    });

    crate::log!("watch"; "watching {}", sync.docs_root().display());

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            Some(event) = async_rx.recv() => {
                for change in translate(&event, sync, Instant::now()) {
                    sync.handle(&change);
                }
            }
            _ = tokio::time::sleep(sync.sleep_duration(Instant::now())) => {
                sync.tick(Instant::now());
            }
        }

        if crate::core::is_shutdown() {
            break;
        }
    }

    drop(watcher);
    Ok(())
}
