//! Slot pool for queued replay clips.
//!
//! A slot is one numbered unit of the fixed-capacity pool, backed by a
//! family of on-disk artifact files sharing the slot's index. Slot state is
//! never stored durably: it is derived from which artifacts exist in the
//! queue directory, and can be re-derived at any time with
//! [`SlotPool::refresh`].
//!
//! The pool maintains the density invariant: used slots always occupy a
//! contiguous prefix of the index range. [`SlotPool::compact`] restores it
//! after a slot is cleared.

mod error;
mod naming;
mod pool;
mod state;

pub use error::PoolError;
pub use naming::{artifact_path, ArtifactKind};
pub use pool::SlotPool;
pub use state::SlotState;
