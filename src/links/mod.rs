//! Link integrity checking.
//!
//! ```text
//! markdown files → LinkExtractor (per line) → LinkResolver → LinkReport
//! ```
//!
//! Only local references are checked; external URLs are never fetched.

mod extract;
mod report;
mod resolve;

pub use extract::{LinkExtractor, LocalLink};
pub use report::{BrokenLink, LinkReport};
pub use resolve::{LinkResolver, Resolution};

use std::path::{Path, PathBuf};

use jwalk::WalkDir;
use rayon::prelude::*;

use crate::core::{ScanError, ensure_dir, is_ignored};
use crate::utils::path::relative_slash;
use crate::utils::path::route::MD_SUFFIX;

/// One extracted reference, tied to its source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference {
    pub source_file: PathBuf,
    /// 1-based line number.
    pub line_number: usize,
    /// Target with any fragment removed.
    pub raw_target: String,
    pub display_text: String,
}

impl LinkReference {
    pub fn new(source_file: &Path, link: &LocalLink<'_>) -> Self {
        Self {
            source_file: source_file.to_path_buf(),
            line_number: link.line,
            raw_target: link.target.to_string(),
            display_text: link.text.to_string(),
        }
    }

    fn into_broken(self) -> BrokenLink {
        BrokenLink {
            target: self.raw_target,
            line: self.line_number,
            text: self.display_text,
        }
    }
}

/// Check every markdown document under `root`.
///
/// Fails only when `root` is missing or not a directory.
pub fn check_links(root: &Path) -> Result<LinkReport, ScanError> {
    ensure_dir(root)?;

    let files = find_markdown_files(root);
    crate::debug!("check"; "scanning {} documents", files.len());

    let resolver = LinkResolver::new(root);
    let results: Vec<(String, Vec<BrokenLink>)> = files
        .par_iter()
        .map(|file| (relative_slash(file, root), check_file(file, &resolver)))
        .collect();

    let mut report = LinkReport::default();
    for (source, broken) in results {
        report.insert(source, broken);
    }
    Ok(report)
}

/// Broken links of one document on disk; unreadable documents have none.
pub fn check_file(file: &Path, resolver: &LinkResolver) -> Vec<BrokenLink> {
    match std::fs::read_to_string(file) {
        Ok(content) => check_document(file, &content, resolver),
        Err(e) => {
            crate::log!("warn"; "skipping unreadable {}: {}", file.display(), e);
            Vec::new()
        }
    }
}

/// Broken links of one document given its text.
pub fn check_document(file: &Path, content: &str, resolver: &LinkResolver) -> Vec<BrokenLink> {
    LinkExtractor::new(content)
        .map(|link| LinkReference::new(file, &link))
        .filter(|reference| resolver.resolve(reference).is_broken())
        .map(LinkReference::into_broken)
        .collect()
}

/// All `.md` files below `root`, skipping ignored directories, sorted.
pub fn find_markdown_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .process_read_dir(|_, _, _, children| {
            children.retain(|entry| {
                entry
                    .as_ref()
                    .map(|e| !is_ignored(&e.file_name.to_string_lossy()))
                    .unwrap_or(true)
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(MD_SUFFIX))
        .map(|e| e.path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_rooted_target_reported() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "index.md", "# Home\n\nRead the [page](/missing) first.\n");

        let report = check_links(root).unwrap();
        assert_eq!(
            report.files["index.md"],
            vec![BrokenLink {
                target: "/missing".into(),
                line: 3,
                text: "page".into(),
            }]
        );
    }

    #[test]
    fn test_fenced_links_not_reported() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "setup.md", "");
        write(root, "guide.md", "See [setup](./setup)\n```\n[fake](./fake)\n```\n");

        let report = check_links(root).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_report_groups_by_relative_path() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a/b.md", "[ok](./guide) [bad](./nope.md)\n[up](../intro)");
        write(root, "a/guide.md", "");
        write(root, "intro.md", "[x](/a/gone)");
        write(root, "node_modules/pkg/readme.md", "[ignored](./never.md)");

        let report = check_links(root).unwrap();
        assert_eq!(report.file_count(), 2);
        assert_eq!(report.link_count(), 2);
        assert_eq!(report.files["a/b.md"][0].target, "./nope.md");
        assert_eq!(report.files["intro.md"][0].line, 1);
    }

    #[test]
    fn test_find_markdown_files_skips_ignored() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "a.md", "");
        write(root, ".hidden/b.md", "");
        write(root, ".git/c.md", "");
        write(root, "dist/d.md", "");
        write(root, "notes.txt", "");

        let files: Vec<String> = find_markdown_files(root)
            .iter()
            .map(|f| relative_slash(f, root))
            .collect();
        assert_eq!(files, [".hidden/b.md", "a.md"]);
    }

    #[test]
    fn test_invalid_root() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            check_links(&temp.path().join("nope")),
            Err(ScanError::NotFound(_))
        ));
    }
}
