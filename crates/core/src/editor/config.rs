//! Configuration for the editor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Path to the editor program.
    pub program: PathBuf,

    /// Settings blob passed to the editor before the target path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_json: Option<String>,
}

impl EditorConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            settings_json: None,
        }
    }

    /// Sets the settings blob.
    pub fn with_settings(mut self, settings: impl Into<String>) -> Self {
        self.settings_json = Some(settings.into());
        self
    }
}
