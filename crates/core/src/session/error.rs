//! Error types for the session module.

use thiserror::Error;

use crate::slots::PoolError;

/// Errors reported to the issuer of a command or ingest request.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Command name not recognized at the protocol boundary.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Slot number outside the configured pool.
    #[error("slot {slot} out of range 1..={capacity}")]
    SlotOutOfRange { slot: i64, capacity: usize },

    /// A slot number was supplied for a command that takes none.
    #[error("{cmd} takes no slot (got {slot})")]
    UnexpectedSlot { cmd: String, slot: i64 },

    /// The command requires a slot that holds a clip.
    #[error("slot {slot} is empty")]
    SlotEmpty { slot: usize },

    /// Export requested with nothing to export.
    #[error("no cut replays available")]
    NoCutReplays,

    /// Underlying pool operation failed.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// The session actor is gone.
    #[error("session is closed")]
    SessionClosed,
}
