//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading the `.docket` record.
///
/// None of these are fatal: the loader reports them as a warning and falls
/// back to defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("could not parse `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}
