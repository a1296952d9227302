//! External process editor implementation.

use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::config::EditorConfig;
use super::error::EditorError;
use super::traits::Editor;

/// Launches the configured editor program on a target file.
pub struct ExternalEditor {
    config: EditorConfig,
}

impl ExternalEditor {
    /// Creates a new external editor with the given configuration.
    pub fn new(config: EditorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Editor for ExternalEditor {
    fn name(&self) -> &str {
        "external"
    }

    async fn open(&self, target: &Path) -> Result<(), EditorError> {
        debug!(program = %self.config.program.display(), target = %target.display(), "launching editor");

        let mut command = Command::new(&self.config.program);
        if let Some(settings) = &self.config.settings_json {
            command.arg("--settings-json").arg(settings);
        }
        command
            .arg(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let mut child = command.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                EditorError::ProgramNotFound {
                    path: self.config.program.clone(),
                }
            } else {
                EditorError::Io(e)
            }
        })?;

        let status = child.wait().await?;
        if !status.success() {
            return Err(EditorError::Failed {
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_program_maps_to_not_found() {
        let editor = ExternalEditor::new(EditorConfig::new("/no/such/editor-binary"));
        let result = editor.open(Path::new("/tmp/clip.mp4")).await;
        assert!(matches!(
            result,
            Err(EditorError::ProgramNotFound { path }) if path == PathBuf::from("/no/such/editor-binary")
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_exit() {
        let editor = ExternalEditor::new(EditorConfig::new("true"));
        assert!(editor.open(Path::new("/tmp/clip.mp4")).await.is_ok());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let editor = ExternalEditor::new(EditorConfig::new("false"));
        let result = editor.open(Path::new("/tmp/clip.mp4")).await;
        assert!(matches!(result, Err(EditorError::Failed { .. })));
    }
}
