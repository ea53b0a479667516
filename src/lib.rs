//! Sumi-BLC: a broken link checker
//!
//! This crate crawls a website breadth-first from a seed URL, checks every
//! link-bearing reference it finds, and reports the links that do not resolve
//! to an acceptable status.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-BLC operations
///
/// Only startup problems are represented here. Failures while crawling a page
/// or checking a link are folded into a [`state::Status`] instead.
#[derive(Debug, Error)]
pub enum BlcError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sumi-BLC operations
pub type Result<T> = std::result::Result<T, BlcError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::crawler::{Coordinator, CrawlReport};
pub use crate::state::{Link, ResolvedUrl, Status};
pub use crate::url::{resolve, Classification, Resolution};
