//! Error types for the assembler module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during assembly.
#[derive(Debug, Error)]
pub enum AssemblerError {
    /// FFmpeg binary not found.
    #[error("FFmpeg not found at path: {path}")]
    FfmpegNotFound { path: PathBuf },

    /// FFprobe binary not found.
    #[error("FFprobe not found at path: {path}")]
    FfprobeNotFound { path: PathBuf },

    /// A clip listed in the job does not exist.
    #[error("Clip not found: {path}")]
    ClipNotFound { path: PathBuf },

    /// The job contained no clips.
    #[error("Assembly job contained no clips")]
    EmptyJob,

    /// Output directory does not exist and could not be created.
    #[error("Failed to create output directory: {path}")]
    OutputDirectoryFailed { path: PathBuf },

    /// Assembly process failed.
    #[error("Assembly failed: {reason}")]
    AssemblyFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// Assembly timed out.
    #[error("Assembly timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Failed to probe a clip.
    #[error("Failed to probe clip: {reason}")]
    ProbeFailed { reason: String },

    /// I/O error during assembly.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssemblerError {
    /// Creates a new assembly failed error with stderr output.
    pub fn assembly_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::AssemblyFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates a new probe failed error.
    pub fn probe_failed(reason: impl Into<String>) -> Self {
        Self::ProbeFailed {
            reason: reason.into(),
        }
    }
}
