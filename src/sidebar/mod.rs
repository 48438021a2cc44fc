//! Navigation sidebar compiler.
//!
//! Turns a [`DocTree`] snapshot into the nested `{text, link?, collapsed?, items?}`
//! structure consumed by the renderer:
//!
//! ```text
//! DocSource → DocTree (sorted snapshot) → compile → Vec<SidebarItem>
//! ```
//!
//! A directory becomes a group only when something navigable remains below
//! it, and is clickable only when it has its own entry-point document.

mod title;

pub use title::{MAX_TITLE_LEN, WORD_BREAK_RATIO, truncate_title};

use std::path::Path;

use serde::Serialize;

use crate::core::{DocTree, FsSource, NodeId, ScanError};
use crate::utils::path::route::strip_md_suffix;

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarItem {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SidebarItem>>,
}

/// Knobs for sidebar compilation.
#[derive(Debug, Clone, Copy)]
pub struct SidebarOptions {
    /// Maximum display title length (characters).
    pub max_title_len: usize,
    /// Fraction of `max_title_len` a word-boundary cut must reach.
    pub word_break_ratio: f64,
    /// Value of `collapsed` on every group.
    pub collapse_folders: bool,
}

impl Default for SidebarOptions {
    fn default() -> Self {
        Self {
            max_title_len: MAX_TITLE_LEN,
            word_break_ratio: WORD_BREAK_RATIO,
            collapse_folders: false,
        }
    }
}

impl SidebarOptions {
    pub fn with_collapse_folders(mut self, collapse: bool) -> Self {
        self.collapse_folders = collapse;
        self
    }

    fn title(&self, raw: &str) -> String {
        truncate_title(raw, self.max_title_len, self.word_break_ratio)
    }
}

/// Compile the sidebar for the directory tree at `root`.
pub fn compile_dir(root: &Path, options: &SidebarOptions) -> Result<Vec<SidebarItem>, ScanError> {
    let tree = DocTree::build(&FsSource::new(root))?;
    Ok(compile(&tree, options))
}

/// Compile the sidebar from a snapshot. Pure; never fails.
pub fn compile(tree: &DocTree, options: &SidebarOptions) -> Vec<SidebarItem> {
    compile_children(tree, DocTree::ROOT, options)
}

fn compile_children(tree: &DocTree, parent: NodeId, options: &SidebarOptions) -> Vec<SidebarItem> {
    let mut items = Vec::new();

    for (id, node) in tree.children(parent) {
        if node.is_dir() {
            let children = compile_children(tree, id, options);
            if children.is_empty() {
                continue;
            }
            items.push(SidebarItem {
                text: options.title(&node.title),
                link: node.has_index.then(|| format!("/{}/", node.rel_path)),
                collapsed: Some(options.collapse_folders),
                items: Some(children),
            });
        } else {
            items.push(SidebarItem {
                text: options.title(&node.title),
                link: Some(format!("/{}", strip_md_suffix(&node.rel_path))),
                collapsed: None,
                items: None,
            });
        }
    }

    items
}
