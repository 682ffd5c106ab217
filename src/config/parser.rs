use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Every key is optional; missing keys take their defaults.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_lens::config::load_config;
///
/// let config = load_config(Path::new("lens.toml")).unwrap();
/// println!("Probe timeout: {}ms", config.analyzer.probe_timeout_ms);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a hex-encoded SHA-256 hash of configuration text
pub fn compute_config_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fingerprints the effective configuration
///
/// The configuration is rendered back to canonical TOML before hashing, so
/// two runs share a fingerprint exactly when every setting matches, however
/// each was supplied (file, defaults, or command-line overrides).
///
/// # Arguments
///
/// * `config` - The configuration an analysis runs with
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the canonical TOML
/// * `Err(ConfigError)` - The configuration could not be rendered
pub fn config_fingerprint(config: &Config) -> Result<String, ConfigError> {
    let canonical = toml::to_string(config)?;
    Ok(compute_config_hash(&canonical))
}
