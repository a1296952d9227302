//! The replay session: single-writer owner of the slot pool.
//!
//! All pool-mutating work — operator commands and ingestion completions
//! alike — flows through one actor lane and is processed strictly in
//! arrival order, so a command can never interleave filesystem operations
//! with an inbound file assignment. Callers submit requests through a
//! [`SessionHandle`] and await completion; reads go through a cached view
//! that stays responsive while the lane is busy.

mod actor;
mod commands;
mod error;
mod types;

pub use actor::{Session, SessionHandle, UpdateCallback};
pub use commands::Command;
pub use error::CommandError;
pub use types::PoolView;
