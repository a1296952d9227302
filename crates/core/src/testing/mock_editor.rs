//! Mock editor for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::editor::{Editor, EditorError};

/// Mock implementation of the Editor trait.
///
/// Records every opened path and can be armed to fail the next invocation.
#[derive(Debug, Clone, Default)]
pub struct MockEditor {
    opened: Arc<RwLock<Vec<PathBuf>>>,
    next_error: Arc<RwLock<Option<EditorError>>>,
    open_duration_ms: Arc<RwLock<u64>>,
}

impl MockEditor {
    /// Create a new mock editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths the editor was opened on, in order.
    pub async fn opened_paths(&self) -> Vec<PathBuf> {
        self.opened.read().await.clone()
    }

    /// Number of invocations so far.
    pub async fn open_count(&self) -> usize {
        self.opened.read().await.len()
    }

    /// Make the next invocation fail with the given error.
    pub async fn fail_next(&self, error: EditorError) {
        *self.next_error.write().await = Some(error);
    }

    /// Simulated editing duration.
    pub async fn set_open_duration(&self, duration: Duration) {
        *self.open_duration_ms.write().await = duration.as_millis() as u64;
    }
}

#[async_trait]
impl Editor for MockEditor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn open(&self, target: &Path) -> Result<(), EditorError> {
        self.opened.write().await.push(target.to_path_buf());

        let delay = *self.open_duration_ms.read().await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(())
    }
}
