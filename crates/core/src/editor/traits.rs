//! Trait definitions for the editor module.

use async_trait::async_trait;
use std::path::Path;

use super::error::EditorError;

/// An interactive editor that can be opened on a media file.
#[async_trait]
pub trait Editor: Send + Sync {
    /// Returns the name of this editor implementation.
    fn name(&self) -> &str;

    /// Opens the editor on the target file and waits for it to exit.
    async fn open(&self, target: &Path) -> Result<(), EditorError>;
}
