use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::assembler::AssemblerConfig;
use crate::editor::EditorConfig;
use crate::watcher::WatcherConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub export: ExportConfig,
    pub editor: EditorConfig,
    #[serde(default)]
    pub assembler: AssemblerConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Input directory configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Directory the capture tool drops new clips into
    pub dir: PathBuf,
    /// Regex matched against bare file names; non-matching files are ignored
    #[serde(default = "default_pattern")]
    pub pattern: String,
}

fn default_pattern() -> String {
    r"^Replay.*\.mp4$".to_string()
}

/// Queue directory configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    #[serde(default = "default_queue_dir")]
    pub dir: PathBuf,
    /// Number of slots, fixed for the process lifetime
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            dir: default_queue_dir(),
            capacity: default_capacity(),
        }
    }
}

fn default_queue_dir() -> PathBuf {
    PathBuf::from("queue")
}

fn default_capacity() -> usize {
    6
}

/// Export configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Where the assembled file is written
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Initial transition selection (see the transition table)
    #[serde(default = "default_transition")]
    pub transition: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            transition: default_transition(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("replay-export.mp4")
}

fn default_transition() -> String {
    "fade".to_string()
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (editor settings blob redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub input: InputConfig,
    pub queue: QueueConfig,
    pub export: ExportConfig,
    pub editor: SanitizedEditorConfig,
    pub server: ServerConfig,
}

/// Sanitized editor config (settings blob hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedEditorConfig {
    pub program: PathBuf,
    pub settings_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            input: config.input.clone(),
            queue: config.queue.clone(),
            export: config.export.clone(),
            editor: SanitizedEditorConfig {
                program: config.editor.program.clone(),
                settings_configured: config.editor.settings_json.is_some(),
            },
            server: config.server.clone(),
        }
    }
}
