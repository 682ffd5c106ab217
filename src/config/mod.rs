//! Configuration module for Sumi-Lens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional, so an empty file (or no file at all) yields the defaults.
//!
//! # Example
//!
//! ```no_run
//! use sumi_lens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lens.toml")).unwrap();
//! println!("Overall timeout: {}ms", config.analyzer.overall_timeout_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AnalyzerConfig, Config, HostMatching, UserAgentConfig, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{compute_config_hash, config_fingerprint, load_config, parse_config};
pub use validation::validate;
