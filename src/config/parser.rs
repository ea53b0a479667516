use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Name of the configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "sumi-blc.toml";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sumi_blc::config::load_config;
///
/// let config = load_config(Path::new("sumi-blc.toml")).unwrap();
/// println!("Concurrent checks: {}", config.crawler.max_concurrent_checks);
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

/// Computes a SHA-256 hash of the configuration file content
///
/// The hash is logged on startup so two runs can be compared.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

/// Resolves the configuration for a run
///
/// An explicit path must exist and load cleanly. Without one, the default
/// file in `dir` is used when present; otherwise the built-in defaults apply.
///
/// # Returns
///
/// The configuration and, when it came from a file, that file's hash.
/// `None` means the defaults were used.
pub fn resolve_config(
    explicit: Option<&Path>,
    dir: &Path,
) -> Result<(Config, Option<String>), ConfigError> {
    if let Some(path) = explicit {
        let (config, hash) = load_config_with_hash(path)?;
        return Ok((config, Some(hash)));
    }

    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        let (config, hash) = load_config_with_hash(&default_path)?;
        Ok((config, Some(hash)))
    } else {
        Ok((Config::default(), None))
    }
}
