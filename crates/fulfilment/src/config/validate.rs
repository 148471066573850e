use super::{types::FulfilmentConfig, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Cubby space and allocation attempts are not 0
/// - Robot call timeout is not 0
pub fn validate_config(config: &FulfilmentConfig) -> Result<(), ConfigError> {
    if config.allocator.cubby_space == 0 {
        return Err(ConfigError::ValidationError(
            "allocator.cubby_space cannot be 0".to_string(),
        ));
    }

    if config.allocator.max_attempts == 0 {
        return Err(ConfigError::ValidationError(
            "allocator.max_attempts cannot be 0".to_string(),
        ));
    }

    if config.robot.call_timeout_ms == 0 {
        return Err(ConfigError::ValidationError(
            "robot.call_timeout_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}
