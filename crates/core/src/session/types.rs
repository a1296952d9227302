//! Types for the session module.

use serde::{Deserialize, Serialize};

/// Full snapshot of the observable session state.
///
/// This is the exact payload pushed to every control client on connect and
/// after every mutation: slot codes ordered 1..N (0 = clear, 1 = uncut,
/// 2 = cut), the progress flag, and the selected transition id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolView {
    pub slots: Vec<u8>,
    pub progress: bool,
    pub transition: String,
}
