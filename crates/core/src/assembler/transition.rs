//! The fixed, ordered table of transition effects and the cyclic selection
//! over it.

use serde::Serialize;

/// A named visual effect applied between consecutive clips during export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionDescriptor {
    /// Stable identifier shown to control clients.
    pub id: &'static str,
    /// The ffmpeg xfade transition name.
    pub xfade: &'static str,
    /// Transition duration in seconds.
    pub duration_secs: f64,
}

/// The ordered, wrapping list of available transitions.
pub const TRANSITIONS: &[TransitionDescriptor] = &[
    TransitionDescriptor {
        id: "fade",
        xfade: "fade",
        duration_secs: 0.5,
    },
    TransitionDescriptor {
        id: "wipe-left",
        xfade: "wipeleft",
        duration_secs: 0.4,
    },
    TransitionDescriptor {
        id: "slide-right",
        xfade: "slideright",
        duration_secs: 0.4,
    },
    TransitionDescriptor {
        id: "circle-open",
        xfade: "circleopen",
        duration_secs: 0.6,
    },
    TransitionDescriptor {
        id: "dissolve",
        xfade: "dissolve",
        duration_secs: 0.5,
    },
];

/// Cyclic cursor over [`TRANSITIONS`] with explicit wrap-around arithmetic.
#[derive(Debug, Clone)]
pub struct TransitionCycle {
    index: usize,
}

impl TransitionCycle {
    /// Starts the cycle at the transition with the given id.
    pub fn starting_at(id: &str) -> Option<Self> {
        TRANSITIONS
            .iter()
            .position(|t| t.id == id)
            .map(|index| Self { index })
    }

    /// The currently selected transition.
    pub fn current(&self) -> TransitionDescriptor {
        TRANSITIONS[self.index]
    }

    /// Advances to the next entry, wrapping to the first after the last.
    pub fn advance(&mut self) -> TransitionDescriptor {
        self.index = (self.index + 1) % TRANSITIONS.len();
        self.current()
    }
}

impl Default for TransitionCycle {
    fn default() -> Self {
        Self { index: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_at_known_id() {
        let cycle = TransitionCycle::starting_at("dissolve").unwrap();
        assert_eq!(cycle.current().id, "dissolve");
    }

    #[test]
    fn test_starting_at_unknown_id() {
        assert!(TransitionCycle::starting_at("teleport").is_none());
    }

    #[test]
    fn test_advance_walks_the_table_in_order() {
        let mut cycle = TransitionCycle::default();
        for expected in TRANSITIONS.iter().skip(1) {
            assert_eq!(cycle.advance().id, expected.id);
        }
    }

    #[test]
    fn test_advance_wraps_from_last_to_first() {
        let last = TRANSITIONS.last().unwrap();
        let mut cycle = TransitionCycle::starting_at(last.id).unwrap();
        assert_eq!(cycle.advance().id, TRANSITIONS[0].id);
    }
}
