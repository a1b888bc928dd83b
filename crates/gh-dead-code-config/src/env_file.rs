//! `.env` loading
//!
//! Runs first in the binary, before the logger and the config: `RUST_LOG`,
//! the `BIND_ADDRESS`/`PORT`/`GITHUB_HOST` overrides and the token lookup all
//! read the merged environment. Variables already set are never replaced.

use std::path::{Path, PathBuf};

/// Merge `.env` from the working directory (or a parent) into the environment
///
/// Returns the file that was loaded, if any.
pub fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

/// Merge a specific env file into the environment
pub fn load_env_file_from(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok()?;
    Some(path.to_path_buf())
}
