//! Logical slot state, derived from artifact presence.

use serde::{Deserialize, Serialize};

/// Logical state of a slot.
///
/// Never stored independently: always a pure function of which artifact
/// files exist for the slot's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// No original artifact present.
    Clear,
    /// Original present, cut absent.
    Uncut,
    /// Both original and cut present.
    Cut,
}

impl SlotState {
    /// Derives the state from artifact presence.
    pub fn derive(has_original: bool, has_cut: bool) -> Self {
        match (has_original, has_cut) {
            (false, _) => SlotState::Clear,
            (true, false) => SlotState::Uncut,
            (true, true) => SlotState::Cut,
        }
    }

    /// Whether the slot holds a clip.
    pub fn is_used(&self) -> bool {
        !matches!(self, SlotState::Clear)
    }

    /// Wire representation: 0 = clear, 1 = uncut, 2 = cut.
    pub fn code(&self) -> u8 {
        match self {
            SlotState::Clear => 0,
            SlotState::Uncut => 1,
            SlotState::Cut => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_rule() {
        assert_eq!(SlotState::derive(false, false), SlotState::Clear);
        // A stray cut without an original still counts as clear.
        assert_eq!(SlotState::derive(false, true), SlotState::Clear);
        assert_eq!(SlotState::derive(true, false), SlotState::Uncut);
        assert_eq!(SlotState::derive(true, true), SlotState::Cut);
    }

    #[test]
    fn test_wire_codes() {
        assert_eq!(SlotState::Clear.code(), 0);
        assert_eq!(SlotState::Uncut.code(), 1);
        assert_eq!(SlotState::Cut.code(), 2);
    }
}
