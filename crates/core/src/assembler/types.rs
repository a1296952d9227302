//! Types for the assembler module.

use std::path::PathBuf;

use super::transition::TransitionDescriptor;

/// An assembly request: ordered clips plus the transition between them.
#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyJob {
    /// Clip paths in the order they appear in the output.
    pub clips: Vec<PathBuf>,
    /// Transition applied between consecutive clips.
    pub transition: TransitionDescriptor,
    /// Where the assembled file is written.
    pub output_path: PathBuf,
}

/// Outcome of a successful assembly.
#[derive(Debug, Clone)]
pub struct AssemblyResult {
    pub output_path: PathBuf,
    pub output_size_bytes: u64,
    pub duration_ms: u64,
}
