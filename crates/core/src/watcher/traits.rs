//! Filename filtering for external intake.

use regex_lite::Regex;

use super::error::WatcherError;

/// Decides which file names are taken in from the input directory.
///
/// Non-matching files are ignored and left in place.
pub trait ClipFilter: Send + Sync {
    fn matches(&self, file_name: &str) -> bool;
}

/// Regex-based filter over the bare file name.
pub struct RegexFilter {
    pattern: Regex,
}

impl RegexFilter {
    pub fn new(pattern: &str) -> Result<Self, WatcherError> {
        let pattern = Regex::new(pattern).map_err(|e| WatcherError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }
}

impl ClipFilter for RegexFilter {
    fn matches(&self, file_name: &str) -> bool {
        self.pattern.is_match(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_filter_matches() {
        let filter = RegexFilter::new(r"^Replay.*\.mp4$").unwrap();
        assert!(filter.matches("Replay 2026-08-07.mp4"));
        assert!(!filter.matches("notes.txt"));
        assert!(!filter.matches("Replay.mp4.part"));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let result = RegexFilter::new("([");
        assert!(matches!(result, Err(WatcherError::InvalidPattern { .. })));
    }
}
