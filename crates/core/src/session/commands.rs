//! Operator commands and their protocol-boundary validation.

use super::error::CommandError;

/// A validated operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Open the external editor on a slot's original clip.
    Edit { slot: usize },
    /// Delete a slot's artifacts and re-compact the pool.
    Clear { slot: usize },
    /// Advance the transition selection.
    CycleTransition,
    /// Assemble all cut clips into the output file.
    Export,
    /// Open the external editor on the exported output file.
    Preview,
}

impl Command {
    /// Wire name of the command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Edit { .. } => "EDIT",
            Command::Clear { .. } => "CLEAR",
            Command::CycleTransition => "TRANSITION",
            Command::Export => "EXPORT",
            Command::Preview => "PREVIEW",
        }
    }

    /// Validates a wire command against the pool bounds.
    ///
    /// EDIT and CLEAR require a slot in `1..=capacity`; the remaining
    /// commands require slot 0. Anything else is rejected here, before the
    /// session ever sees it.
    pub fn parse(cmd: &str, slot: i64, capacity: usize) -> Result<Command, CommandError> {
        match cmd {
            "EDIT" | "CLEAR" => {
                if slot < 1 || slot > capacity as i64 {
                    return Err(CommandError::SlotOutOfRange { slot, capacity });
                }
                let slot = slot as usize;
                Ok(if cmd == "EDIT" {
                    Command::Edit { slot }
                } else {
                    Command::Clear { slot }
                })
            }
            "TRANSITION" | "EXPORT" | "PREVIEW" => {
                if slot != 0 {
                    return Err(CommandError::UnexpectedSlot {
                        cmd: cmd.to_string(),
                        slot,
                    });
                }
                Ok(match cmd {
                    "TRANSITION" => Command::CycleTransition,
                    "EXPORT" => Command::Export,
                    _ => Command::Preview,
                })
            }
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edit_with_valid_slot() {
        let cmd = Command::parse("EDIT", 3, 6).unwrap();
        assert_eq!(cmd, Command::Edit { slot: 3 });
    }

    #[test]
    fn test_parse_edit_slot_zero_rejected() {
        let result = Command::parse("EDIT", 0, 6);
        assert!(matches!(
            result,
            Err(CommandError::SlotOutOfRange { slot: 0, capacity: 6 })
        ));
    }

    #[test]
    fn test_parse_clear_slot_beyond_capacity_rejected() {
        let result = Command::parse("CLEAR", 7, 6);
        assert!(matches!(result, Err(CommandError::SlotOutOfRange { .. })));
    }

    #[test]
    fn test_parse_negative_slot_rejected() {
        let result = Command::parse("EDIT", -1, 6);
        assert!(matches!(result, Err(CommandError::SlotOutOfRange { .. })));
    }

    #[test]
    fn test_parse_unknown_command_rejected() {
        let result = Command::parse("BOGUS", 1, 6);
        assert!(matches!(result, Err(CommandError::UnknownCommand(c)) if c == "BOGUS"));
    }

    #[test]
    fn test_parse_export_requires_slot_zero() {
        assert_eq!(Command::parse("EXPORT", 0, 6).unwrap(), Command::Export);
        assert!(matches!(
            Command::parse("EXPORT", 2, 6),
            Err(CommandError::UnexpectedSlot { .. })
        ));
    }

    #[test]
    fn test_parse_slotless_commands() {
        assert_eq!(
            Command::parse("TRANSITION", 0, 6).unwrap(),
            Command::CycleTransition
        );
        assert_eq!(Command::parse("PREVIEW", 0, 6).unwrap(), Command::Preview);
    }

    #[test]
    fn test_names_round_trip() {
        for (cmd, name) in [
            (Command::Edit { slot: 1 }, "EDIT"),
            (Command::Clear { slot: 1 }, "CLEAR"),
            (Command::CycleTransition, "TRANSITION"),
            (Command::Export, "EXPORT"),
            (Command::Preview, "PREVIEW"),
        ] {
            assert_eq!(cmd.name(), name);
        }
    }
}
