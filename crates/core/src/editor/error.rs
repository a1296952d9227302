//! Error types for the editor module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur invoking the external editor.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Editor program not found.
    #[error("Editor not found at path: {path}")]
    ProgramNotFound { path: PathBuf },

    /// Editor exited with a non-zero status.
    #[error("Editor exited with code: {code:?}")]
    Failed { code: Option<i32> },

    /// I/O error launching or waiting on the editor.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
