use crate::config::types::{AnalyzerConfig, Config, UserAgentConfig};
use crate::ConfigError;

/// Upper bound on concurrent image probes
const MAX_CONCURRENT_PROBES: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_analyzer_config(&config.analyzer)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates analyzer configuration
pub(crate) fn validate_analyzer_config(config: &AnalyzerConfig) -> Result<(), ConfigError> {
    if config.probe_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_ms must be >= 1ms, got {}ms",
            config.probe_timeout_ms
        )));
    }

    if config.overall_timeout_ms < 1 {
        return Err(ConfigError::Validation(format!(
            "overall_timeout_ms must be >= 1ms, got {}ms",
            config.overall_timeout_ms
        )));
    }

    if config.probe_timeout_ms > config.overall_timeout_ms {
        return Err(ConfigError::Validation(format!(
            "probe_timeout_ms ({}ms) cannot exceed overall_timeout_ms ({}ms)",
            config.probe_timeout_ms, config.overall_timeout_ms
        )));
    }

    if let Some(max) = config.max_links_per_category {
        if max < 1 {
            return Err(ConfigError::Validation(
                "max_links_per_category must be a positive integer".to_string(),
            ));
        }
    }

    if let Some(max) = config.max_concurrent_probes {
        if !(1..=MAX_CONCURRENT_PROBES).contains(&max) {
            return Err(ConfigError::Validation(format!(
                "max_concurrent_probes must be between 1 and {}, got {}",
                MAX_CONCURRENT_PROBES, max
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.value.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry line breaks or other control characters
    if let Some(c) = config.value.chars().find(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user agent cannot contain control character {:?}",
            c
        )));
    }

    Ok(())
}
