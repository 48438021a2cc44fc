//! `docket serve`: staging mirror session.

use std::path::Path;
use std::time::Duration;

use anyhow::{Result, bail};

use super::{ServeArgs, resolve_root};
use crate::config::DocsConfig;
use crate::core::{clear_session, register_session};
use crate::links::find_markdown_files;
use crate::log;
use crate::mirror::{self, MirrorError, MirrorSynchronizer, SyncTiming};
use crate::utils::plural_count;

/// Stage the documents and keep the mirror in sync until shutdown.
pub fn serve(args: &ServeArgs) -> Result<()> {
    let root = resolve_root(&args.path)?;

    let documents = find_markdown_files(&root).len();
    if documents == 0 {
        bail!("no markdown files found in `{}`", root.display());
    }

    let config = DocsConfig::load(&root);
    log!("serve"; "{} ({})", config.title, plural_count(documents, "document"));

    let timing = SyncTiming {
        debounce: Duration::from_millis(args.debounce_ms),
        cooldown: Duration::from_millis(args.cooldown_ms),
    };
    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::unbounded_channel();

    let result = start_session(&root, timing, |staging| {
        register_session(staging.to_path_buf(), shutdown_tx);
    })
    .map_err(anyhow::Error::from)
    .and_then(|sync| {
        log!("serve"; "staging at {}", sync.staging_root().display());
        mirror::run(sync, shutdown_rx)
    });

    clear_session();
    result
}

/// Create the staging directory, hand it to `register`, then populate it.
///
/// Registration happens while staging is still empty, so a termination
/// signal during the initial copy still finds something to tear down.
fn start_session(
    root: &Path,
    timing: SyncTiming,
    register: impl FnOnce(&Path),
) -> Result<MirrorSynchronizer, MirrorError> {
    let mut sync = MirrorSynchronizer::create(root, timing)?;
    register(sync.staging_root());
    sync.populate()?;
    Ok(sync)
}
