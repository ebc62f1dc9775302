//! Application configuration loaded from environment variables.
//!
//! - `PLANBOOK_DATA_DIR` — directory holding the persisted blobs
//!   (defaults to `planbook-data` in the working directory).
//! - `PLANBOOK_SHEET_URL` — optional remote source URL applied at startup;
//!   configuring it puts the instrument repository in read-only mode.

use std::path::PathBuf;

/// Default data directory when `PLANBOOK_DATA_DIR` is unset.
const DEFAULT_DATA_DIR: &str = "planbook-data";

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub sheet_url: Option<String>,
}

/// Loads the application configuration from environment variables.
///
/// Empty values are treated as absent.
///
/// # Errors
///
/// Returns [`PlanbookError::Config`](crate::PlanbookError::Config) if
/// `PLANBOOK_DATA_DIR` points at an existing path that is not a directory.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let data_dir = non_empty_var("PLANBOOK_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    if data_dir.exists() && !data_dir.is_dir() {
        return Err(crate::PlanbookError::Config(format!(
            "PLANBOOK_DATA_DIR points at a file, not a directory: {}",
            data_dir.display()
        )));
    }

    Ok(AppConfig {
        data_dir,
        sheet_url: non_empty_var("PLANBOOK_SHEET_URL"),
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
