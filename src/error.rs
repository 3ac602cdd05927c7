use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures of the module graph command. Always fatal for the run.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to run `{command}` in {}: {source}", .dir.display())]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed in {} ({status}): {stderr}", .dir.display())]
    Failed {
        command: String,
        dir: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

/// Why a license could not be read from a module cache directory.
#[derive(Debug, Error)]
pub enum LocalLicenseError {
    #[error("license: directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("license: unable to find any license file")]
    NoLicenseFile,

    #[error("license: could not guess license type")]
    Unrecognized,

    #[error("license: multiple license types found: {}", .0.join(", "))]
    Ambiguous(Vec<String>),

    #[error("license: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LocalLicenseError {
    pub fn is_missing_directory(&self) -> bool {
        matches!(self, LocalLicenseError::MissingDirectory(_))
    }
}

/// Why the hosting API lookup failed.
#[derive(Debug, Error)]
pub enum RemoteLicenseError {
    #[error("not hosted on {prefix}: {module}")]
    NotHosted { module: String, prefix: String },

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("expected OK: {status}{}", status_suffix(.message))]
    Status { status: u16, message: Option<String> },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Api(String),

    #[error("Unknown")]
    Unknown,
}

fn status_suffix(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(" ({})", message),
        None => String::new(),
    }
}
