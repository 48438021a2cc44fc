//! Leading metadata block of a document.
//!
//! Two block styles are recognized at the start of the file:
//! YAML-like (`---` fenced, one `key: value` per line) and TOML (`+++` fenced).
//! Only `order` and `title` matter for navigation; everything else is ignored.

use std::path::Path;

/// Navigation metadata read from a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    pub order: Option<f64>,
    pub title: Option<String>,
}

impl Frontmatter {
    /// Read metadata from a document on disk.
    ///
    /// Unreadable files and files without a metadata block give an empty result.
    pub fn read(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Extract metadata from document text.
    pub fn parse(content: &str) -> Self {
        match detect_block(content) {
            Some((block, false)) => parse_yaml_like(block),
            Some((block, true)) => parse_toml(block),
            None => Self::default(),
        }
    }

    fn with_order(mut self, order: Option<f64>) -> Self {
        // NaN has no place in a total order
        self.order = order.filter(|o| !o.is_nan());
        self
    }

    fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title.filter(|t| !t.is_empty());
        self
    }
}

/// Detect and extract the metadata block.
/// Returns `(block, is_toml)` if found.
fn detect_block(content: &str) -> Option<(&str, bool)> {
    let trimmed = content.trim_start_matches('\u{feff}').trim_start();

    for (fence, is_toml) in [("---", false), ("+++", true)] {
        if let Some(rest) = trimmed.strip_prefix(fence)
            && let Some(end) = rest.find(&format!("\n{fence}"))
        {
            return Some((rest[..end].trim(), is_toml));
        }
    }

    None
}

/// Parse simple YAML-like metadata (`key: value`).
fn parse_yaml_like(block: &str) -> Frontmatter {
    let mut order = None;
    let mut title = None;

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = scalar(value.trim());
        match key.trim() {
            "order" => order = value.parse::<f64>().ok(),
            "title" => title = Some(value.to_string()),
            _ => {}
        }
    }

    Frontmatter::default().with_order(order).with_title(title)
}

/// Parse TOML metadata.
fn parse_toml(block: &str) -> Frontmatter {
    let Ok(table) = block.parse::<toml::Table>() else {
        return Frontmatter::default();
    };

    let order = match table.get("order") {
        Some(toml::Value::Integer(n)) => Some(*n as f64),
        Some(toml::Value::Float(f)) => Some(*f),
        _ => None,
    };
    let title = table
        .get("title")
        .and_then(toml::Value::as_str)
        .map(str::to_string);

    Frontmatter::default().with_order(order).with_title(title)
}

/// Plain scalar text of a value: the inside of a quoted string, otherwise
/// everything before a ` #` comment.
fn scalar(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(rest) = value.strip_prefix(quote)
            && let Some(end) = rest.find(quote)
        {
            return &rest[..end];
        }
    }
    match value.find(" #") {
        Some(comment) => value[..comment].trim_end(),
        None => value,
    }
}
