//! Path and link-target utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path handling (`normalize_path`, `clean_path`, `relative_slash`)
//! - [`route`]: Link-target helpers (`is_external_target`, `split_path_fragment`, ...)

pub mod fs;
pub mod route;

pub use fs::{clean_path, normalize_path, relative_slash};
