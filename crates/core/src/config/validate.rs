use tracing_subscriber::EnvFilter;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one video extension is configured
/// - Video extensions are non-empty strings
/// - Log level is a valid filter directive
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.matching.video_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "matching.video_extensions cannot be empty".to_string(),
        ));
    }

    if config
        .matching
        .video_extensions
        .iter()
        .any(|e| e.trim_start_matches('.').trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "matching.video_extensions contains an empty extension".to_string(),
        ));
    }

    if let Err(e) = EnvFilter::try_new(&config.logging.level) {
        return Err(ConfigError::ValidationError(format!(
            "logging.level is invalid: {}",
            e
        )));
    }

    Ok(())
}
