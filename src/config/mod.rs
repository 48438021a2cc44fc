//! Documentation configuration from the `.docket` record.
//!
//! The record is an optional JSON object at the documentation root.
//!
//! | Key                       | Default                              |
//! |---------------------------|--------------------------------------|
//! | `title`                   | root directory name                  |
//! | `description`             | `"Documentation"`                    |
//! | `logo` / `favicon`        | `{type: lucide, icon: book-open, color: #62d144}` |
//! | `search`                  | `true`                               |
//! | `sidebar.collapseFolders` | `false`                              |
//! | `outline.enabled`         | `true`                               |
//! | `outline.depth`           | `[2, 3]`                             |
//! | `outline.label`           | `"On this page"`                     |
//!
//! Unknown keys are kept and written back out with the derived config.

mod error;

pub use error::ConfigError;

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File name of the configuration record.
pub const CONFIG_FILE: &str = ".docket";

/// Root configuration structure representing `.docket`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Site title; empty until resolved against the root directory name.
    pub title: String,
    pub description: String,
    pub logo: IconConfig,
    pub favicon: IconConfig,
    pub search: bool,
    pub sidebar: SidebarConfig,
    pub outline: OutlineConfig,
    /// Keys this tool does not interpret, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: "Documentation".into(),
            logo: IconConfig::default(),
            favicon: IconConfig::default(),
            search: true,
            sidebar: SidebarConfig::default(),
            outline: OutlineConfig::default(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub color: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            kind: "lucide".into(),
            icon: "book-open".into(),
            color: "#62d144".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SidebarConfig {
    /// Render directory groups collapsed.
    pub collapse_folders: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    pub enabled: bool,
    /// Lowest and highest heading level shown in the page outline.
    pub depth: [u8; 2],
    pub label: String,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: [2, 3],
            label: "On this page".into(),
        }
    }
}

impl DocsConfig {
    /// Load the record for `root`, never failing.
    ///
    /// A missing record gives defaults silently; an unreadable or malformed
    /// one gives defaults with a warning.
    pub fn load(root: &Path) -> Self {
        let config = match Self::try_load(root) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                crate::log!("warn"; "{}, using default configuration", e);
                crate::debug!("warn"; "{:?}", e);
                Self::default()
            }
        };
        config.with_root_title(root)
    }

    /// Read and parse the record, `None` if it does not exist.
    pub fn try_load(root: &Path) -> Result<Option<Self>, ConfigError> {
        let path = root.join(CONFIG_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::Io(path, e)),
        };
        Self::from_json(&content)
            .map(Some)
            .map_err(|e| ConfigError::Json(path, e))
    }

    /// Parse configuration from a JSON string.
    ///
    /// Only a document that is not a JSON object is an error. A known key
    /// with the wrong shape is reported and left at its default; the other
    /// keys still apply.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        let record: Map<String, Value> = serde_json::from_str(content)?;
        let mut config = Self::default();

        for (key, value) in record {
            match key.as_str() {
                "title" => apply(&mut config.title, &key, value),
                "description" => apply(&mut config.description, &key, value),
                "logo" => apply(&mut config.logo, &key, value),
                "favicon" => apply(&mut config.favicon, &key, value),
                "search" => apply(&mut config.search, &key, value),
                "sidebar" => apply(&mut config.sidebar, &key, value),
                "outline" => apply(&mut config.outline, &key, value),
                _ => {
                    config.extra.insert(key, value);
                }
            }
        }

        Ok(config)
    }

    /// Fill an empty title with the root directory name.
    fn with_root_title(mut self, root: &Path) -> Self {
        if self.title.is_empty() {
            self.title = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        self
    }
}

/// Overwrite `slot` with `value`, or keep the default and warn.
fn apply<T: DeserializeOwned>(slot: &mut T, key: &str, value: Value) {
    match serde_json::from_value(value) {
        Ok(parsed) => *slot = parsed,
        Err(e) => crate::log!("warn"; "ignoring `{}` in {}: {}", key, CONFIG_FILE, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_missing() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("my-docs");
        fs::create_dir(&root).unwrap();

        let config = DocsConfig::load(&root);
        assert_eq!(config.title, "my-docs");
        assert_eq!(config.description, "Documentation");
        assert!(config.search);
        assert!(!config.sidebar.collapse_folders);
        assert_eq!(config.outline.depth, [2, 3]);
    }

    #[test]
    fn test_nested_sections_merge_with_defaults() {
        let config = DocsConfig::from_json(
            r#"{"title": "Handbook", "sidebar": {"collapseFolders": true}, "outline": {"label": "Contents"}}"#,
        )
        .unwrap();
        assert_eq!(config.title, "Handbook");
        assert!(config.sidebar.collapse_folders);
        assert_eq!(config.outline.label, "Contents");
        assert!(config.outline.enabled);
        assert_eq!(config.outline.depth, [2, 3]);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let config = DocsConfig::from_json(r#"{"footer": {"text": "hi"}, "search": false}"#).unwrap();
        assert!(!config.search);
        assert_eq!(config.extra["footer"]["text"], "hi");

        let out = serde_json::to_value(&config).unwrap();
        assert_eq!(out["footer"]["text"], "hi");
        assert_eq!(out["logo"]["type"], "lucide");
        assert_eq!(out["sidebar"]["collapseFolders"], false);
    }

    #[test]
    fn test_malformed_record_falls_back() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILE), "{ not json").unwrap();

        assert!(matches!(
            DocsConfig::try_load(temp.path()),
            Err(ConfigError::Json(..))
        ));
        let config = DocsConfig::load(temp.path());
        assert_eq!(config.description, "Documentation");
    }

    #[test]
    fn test_wrong_typed_key_keeps_the_rest() {
        let config = DocsConfig::from_json(
            r#"{"title": "Handbook", "description": "Ops", "search": "yes", "outline": {"depth": "deep"}}"#,
        )
        .unwrap();
        assert_eq!(config.title, "Handbook");
        assert_eq!(config.description, "Ops");
        assert!(config.search);
        assert_eq!(config.outline, OutlineConfig::default());
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(DocsConfig::from_json("[1, 2]").is_err());
        assert!(DocsConfig::from_json(r#""docs""#).is_err());
    }
}
