pub mod config;
pub mod init;
pub mod report;

pub use config::handle_config;
pub use init::handle_init;
pub use report::handle_report;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Directory holding the projects and `.gomod-license-report.toml`
pub(crate) fn projects_root(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path),
        None => std::env::current_dir().context("Failed to determine current directory"),
    }
}
