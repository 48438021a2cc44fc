//! Core types shared across commands: directory scanning, document
//! metadata, the document tree snapshot and process state.

mod frontmatter;
pub mod scan;
mod state;
mod tree;

pub use scan::{EntryKind, INDEX_FILE, PREVIEW_DIR, ScanError, TreeEntry, ensure_dir, is_ignored, scan_dir};
pub use state::{clear_session, is_shutdown, register_session, setup_shutdown_handler};
pub use tree::{DocNode, DocSource, DocTree, FsSource, NodeId, ORDER_SENTINEL, nav_order, title_case};

#[cfg(test)]
pub(crate) use tree::tests::MemorySource;
