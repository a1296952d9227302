use super::{types::Config, ConfigError};
use crate::assembler::TransitionCycle;
use crate::watcher::RegexFilter;

/// Validate configuration
/// Currently validates:
/// - Input section exists (enforced by serde)
/// - Filename pattern compiles
/// - Pool capacity fits the two-digit slot naming scheme
/// - Initial transition id is a known transition
/// - Server port is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Input validation
    if RegexFilter::new(&config.input.pattern).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "input.pattern {:?} is not a valid regex",
            config.input.pattern
        )));
    }

    // Queue validation
    if config.queue.capacity == 0 {
        return Err(ConfigError::ValidationError(
            "queue.capacity cannot be 0".to_string(),
        ));
    }
    if config.queue.capacity > 99 {
        return Err(ConfigError::ValidationError(
            "queue.capacity cannot exceed 99 (slot names are two digits)".to_string(),
        ));
    }

    // Export validation
    if TransitionCycle::starting_at(&config.export.transition).is_none() {
        return Err(ConfigError::ValidationError(format!(
            "export.transition {:?} is not a known transition",
            config.export.transition
        )));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
