//! Mapping from (slot index, artifact kind) to filesystem paths.

use std::path::{Path, PathBuf};

/// One stage of a slot's content, each backed by its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The clip as it arrived from the input directory.
    Original,
    /// The trimmed clip produced by the external editor.
    Cut,
    /// Cut with audio fades applied.
    Faded,
    /// Cut with the overlay rendered in.
    Overlayed,
    /// The external editor's project file.
    Project,
}

impl ArtifactKind {
    /// All kinds, in the order they are cleaned up.
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Original,
        ArtifactKind::Cut,
        ArtifactKind::Faded,
        ArtifactKind::Overlayed,
        ArtifactKind::Project,
    ];

    fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Original => "",
            ArtifactKind::Cut => "-cutted",
            ArtifactKind::Faded => "-faded",
            ArtifactKind::Overlayed => "-overlayed",
            ArtifactKind::Project => "-proj",
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Project => "llc",
            _ => "mp4",
        }
    }
}

/// Returns the path of the given artifact for a slot.
///
/// Total and deterministic: no I/O, no failure. Slot indices are 1-based
/// and zero-padded to two digits in the file name.
pub fn artifact_path(queue_dir: &Path, slot: usize, kind: ArtifactKind) -> PathBuf {
    queue_dir.join(format!(
        "replay-{:02}{}.{}",
        slot,
        kind.suffix(),
        kind.extension()
    ))
}
