//! Broken-link report types and formatting.

use std::collections::BTreeMap;
use std::fmt;

use owo_colors::OwoColorize;
use serde::Serialize;

use crate::utils::plural_s;

/// A reference that did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub target: String,
    pub line: usize,
    pub text: String,
}

/// Broken links grouped by root-relative source path.
///
/// Only files with at least one broken link appear.
#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkReport {
    pub files: BTreeMap<String, Vec<BrokenLink>>,
}

impl LinkReport {
    /// Record the broken links of one file; empty lists are dropped.
    pub fn insert(&mut self, source: String, links: Vec<BrokenLink>) {
        if !links.is_empty() {
            self.files.insert(source, links);
        }
    }

    pub fn is_clean(&self) -> bool {
        self.files.is_empty()
    }

    /// Count of files with broken links.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Total broken link count.
    pub fn link_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Print the per-file listing to stderr.
    pub fn print(&self) {
        if self.is_clean() {
            return;
        }
        eprintln!();

        for (path, links) in &self.files {
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            for link in links {
                eprintln!(
                    "  {} {}",
                    format!("Line {}:", link.line).dimmed(),
                    link.target.red()
                );
                eprintln!("  {}", format!("Text: \"{}\"", link.text).dimmed());
            }
        }
        eprintln!();
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "{}", "all links are valid".green());
        }

        let links = self.link_count();
        let files = self.file_count();
        write!(
            f,
            "{} {} {} {}",
            "found".dimmed(),
            links.to_string().red().bold(),
            format!("broken link{} in", plural_s(links)).dimmed(),
            format!("{files} file{}", plural_s(files)).dimmed()
        )
    }
}
