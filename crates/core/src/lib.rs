pub mod assembler;
pub mod config;
pub mod editor;
pub mod metrics;
pub mod session;
pub mod slots;
pub mod testing;
pub mod watcher;

pub use assembler::{
    Assembler, AssemblerConfig, AssemblerError, AssemblyJob, AssemblyResult, FfmpegAssembler,
    TransitionCycle, TransitionDescriptor, TRANSITIONS,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ExportConfig,
    InputConfig, QueueConfig, SanitizedConfig, ServerConfig,
};
pub use editor::{Editor, EditorConfig, EditorError, ExternalEditor};
pub use session::{Command, CommandError, PoolView, Session, SessionHandle, UpdateCallback};
pub use slots::{artifact_path, ArtifactKind, PoolError, SlotPool, SlotState};
pub use watcher::{ClipFilter, DirWatcher, RegexFilter, WatcherConfig, WatcherError};
