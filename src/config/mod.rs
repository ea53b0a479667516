//! Configuration module for Sumi-BLC
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_blc::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sumi-blc.toml")).unwrap();
//! println!("Request timeout: {}s", config.crawler.request_timeout);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, resolve_config,
    DEFAULT_CONFIG_FILE,
};
