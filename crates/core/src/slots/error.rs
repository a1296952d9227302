//! Error types for the slot pool.

use thiserror::Error;

/// Errors that can occur during pool operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Every slot already holds a clip.
    #[error("pool is full ({capacity} slots occupied)")]
    PoolFull { capacity: usize },

    /// The slot holds nothing that could be cleared.
    #[error("nothing to clear in slot {slot}")]
    AlreadyClear { slot: usize },

    /// Slot index outside the configured pool.
    #[error("slot {slot} out of range 1..={capacity}")]
    OutOfRange { slot: usize, capacity: usize },

    /// I/O error while touching artifact files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
