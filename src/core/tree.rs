//! Immutable snapshot of a documentation tree.
//!
//! The snapshot is a flat node list with parent/child indices, built in one
//! pass from a [`DocSource`]. Children of every directory are already sorted
//! by `(order, name)`, so consumers only walk it.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use super::frontmatter::Frontmatter;
use super::scan::{EntryKind, INDEX_FILE, ScanError, TreeEntry, scan_dir};
use crate::utils::path::route::MD_SUFFIX;

/// Order assigned to documents without explicit ordering metadata.
pub const ORDER_SENTINEL: f64 = f64::INFINITY;

/// Where directory listings and document metadata come from.
///
/// Paths are relative to the documentation root; the empty path is the root.
pub trait DocSource {
    fn entries(&self, rel: &Path) -> Result<Vec<TreeEntry>, ScanError>;
    fn frontmatter(&self, rel: &Path) -> Frontmatter;
}

/// [`DocSource`] backed by the real file system.
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl DocSource for FsSource {
    fn entries(&self, rel: &Path) -> Result<Vec<TreeEntry>, ScanError> {
        scan_dir(&self.root.join(rel))
    }

    fn frontmatter(&self, rel: &Path) -> Frontmatter {
        Frontmatter::read(&self.root.join(rel))
    }
}

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct DocNode {
    /// File or directory name (with suffix for files).
    pub name: String,
    /// Root-relative path joined with `/`; empty for the root.
    pub rel_path: String,
    pub kind: EntryKind,
    /// Explicit order, or [`ORDER_SENTINEL`].
    pub order: f64,
    /// Display title before truncation.
    pub title: String,
    /// Directory has its own entry-point document.
    pub has_index: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl DocNode {
    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Total order used for navigation: order ascending, then name.
///
/// Names compare case-insensitively first and fall back to byte order, so
/// two distinct names never compare equal.
pub fn nav_order(a: &DocNode, b: &DocNode) -> Ordering {
    a.order
        .total_cmp(&b.order)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone)]
pub struct DocTree {
    nodes: Vec<DocNode>,
}

impl DocTree {
    pub const ROOT: NodeId = 0;

    /// Build a snapshot from `source`.
    ///
    /// Only the root listing may fail; unreadable subdirectories are treated
    /// as empty and missing metadata falls back to defaults.
    pub fn build(source: &impl DocSource) -> Result<Self, ScanError> {
        let entries = source.entries(Path::new(""))?;
        let mut tree = Self { nodes: Vec::new() };

        let (order, title, has_index) = dir_meta(source, "", "Home", &entries);
        tree.nodes.push(DocNode {
            name: String::new(),
            rel_path: String::new(),
            kind: EntryKind::Dir,
            order,
            title,
            has_index,
            parent: None,
            children: Vec::new(),
        });
        tree.fill(source, Self::ROOT, entries);

        Ok(tree)
    }

    pub fn node(&self, id: NodeId) -> &DocNode {
        &self.nodes[id]
    }

    pub fn root(&self) -> &DocNode {
        self.node(Self::ROOT)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &DocNode)> {
        self.nodes[id].children.iter().map(|&c| (c, &self.nodes[c]))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    fn fill(&mut self, source: &impl DocSource, parent: NodeId, entries: Vec<TreeEntry>) {
        let base = self.nodes[parent].rel_path.clone();
        let mut children = Vec::new();

        for entry in entries {
            let rel_path = join_rel(&base, &entry.name);
            match entry.kind {
                EntryKind::Dir => {
                    let sub = source.entries(Path::new(&rel_path)).unwrap_or_else(|e| {
                        crate::debug!("sidebar"; "skip unreadable directory: {}", e);
                        Vec::new()
                    });
                    let fallback = title_case(&entry.name);
                    let (order, title, has_index) = dir_meta(source, &rel_path, &fallback, &sub);
                    let id = self.push(parent, entry, rel_path, order, title, has_index);
                    self.fill(source, id, sub);
                    children.push(id);
                }
                EntryKind::File if is_page(&entry.name) => {
                    let meta = source.frontmatter(Path::new(&rel_path));
                    let title = meta.title.unwrap_or_else(|| title_case(stem(&entry.name)));
                    let order = meta.order.unwrap_or(ORDER_SENTINEL);
                    let id = self.push(parent, entry, rel_path, order, title, false);
                    children.push(id);
                }
                EntryKind::File => {}
            }
        }

        children.sort_by(|&a, &b| nav_order(&self.nodes[a], &self.nodes[b]));
        self.nodes[parent].children = children;
    }

    fn push(
        &mut self,
        parent: NodeId,
        entry: TreeEntry,
        rel_path: String,
        order: f64,
        title: String,
        has_index: bool,
    ) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DocNode {
            name: entry.name,
            rel_path,
            kind: entry.kind,
            order,
            title,
            has_index,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }
}

/// Order, title and entry-point flag of a directory.
fn dir_meta(
    source: &impl DocSource,
    rel_path: &str,
    fallback_title: &str,
    entries: &[TreeEntry],
) -> (f64, String, bool) {
    let has_index = entries.iter().any(|e| !e.is_dir() && e.name == INDEX_FILE);
    if !has_index {
        return (ORDER_SENTINEL, fallback_title.to_string(), false);
    }

    let meta = source.frontmatter(Path::new(&join_rel(rel_path, INDEX_FILE)));
    (
        meta.order.unwrap_or(ORDER_SENTINEL),
        meta.title.unwrap_or_else(|| fallback_title.to_string()),
        true,
    )
}

/// A navigable document: markdown, but not a directory entry point.
#[inline]
fn is_page(name: &str) -> bool {
    name.ends_with(MD_SUFFIX) && name != INDEX_FILE
}

#[inline]
fn stem(name: &str) -> &str {
    name.strip_suffix(MD_SUFFIX).unwrap_or(name)
}

#[inline]
fn join_rel(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

/// Word-boundary title casing: hyphens become spaces, each word capitalized.
///
/// `getting-started` -> `Getting Started`
pub fn title_case(segment: &str) -> String {
    segment
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
