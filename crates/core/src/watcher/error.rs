//! Error types for the watcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur starting the directory watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// The input directory cannot be watched.
    #[error("failed to watch {path}: {source}")]
    WatchFailed {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// The filename pattern does not compile.
    #[error("invalid filename pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// I/O error scanning the input directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
