/// Error types for the scan engine.
///
/// Only [`ScanError`] can abort a scan. Directory and file failures are
/// recovered locally: the scanner turns them into `ScanEvent::Skipped`
/// messages and carries on with the next sibling.
use std::path::PathBuf;
use std::time::Duration;

/// Failures that prevent a scan from starting or abandon it mid-walk.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("a scan is already in progress")]
    AlreadyRunning,

    #[error("could not determine the user's home directory")]
    HomeDirUnavailable,

    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to build loader thread pool: {0}")]
    ThreadPool(String),

    #[error("scanner panicked: {0}")]
    Panicked(String),
}

/// A directory that exists but could not be listed.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("cannot read directory {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

impl DiscoveryError {
    /// Path of the directory that failed.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Unreadable { path, .. } => path,
        }
    }
}

/// A candidate file that could not be turned into a profile.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("reading {path} timed out after {timeout:?}")]
    TimedOut { path: PathBuf, timeout: Duration },
}

impl LoadError {
    /// Path of the file that was rejected.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Read { path, .. }
            | Self::Parse { path, .. }
            | Self::TimedOut { path, .. } => path,
        }
    }
}

/// Failures while writing a summary or profile export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
