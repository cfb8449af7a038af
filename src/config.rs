//! Configuration management for pseudosh.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.pseudosh/config.toml`
//! - Defaults for every setting, so the file is optional
//!
//! # Configuration File
//!
//! The configuration file is located at `~/.pseudosh/config.toml`:
//!
//! ```toml
//! [server]
//! listen = "127.0.0.1:7878"
//!
//! [fetch]
//! # Overall timeout for one curl request, in seconds
//! timeout_secs = 10
//! # Response bodies longer than this are truncated
//! max_body_bytes = 1048576
//!
//! [client]
//! server = "http://127.0.0.1:7878"
//! ```

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Outbound fetch bounds for the `curl` command
    pub fetch: FetchConfig,
    /// Attach client settings
    pub client: ClientConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:7878".to_string(),
        }
    }
}

/// Outbound fetch bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Overall request timeout in seconds
    pub timeout_secs: u64,
    /// Response body ceiling in bytes; longer bodies are truncated
    pub max_body_bytes: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Attach client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the server to attach to
    pub server: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: "http://127.0.0.1:7878".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(content) => match toml::from_str(&content) {
                        Ok(config) => return config,
                        Err(err) => {
                            warn!("ignoring invalid config {}: {}", path.display(), err)
                        }
                    },
                    Err(err) => warn!("failed to read config {}: {}", path.display(), err),
                }
            }
        }
        Self::default()
    }

    fn config_path() -> Option<PathBuf> {
        data_dir().map(|dir| dir.join("config.toml"))
    }
}

/// Directory for configuration and logs, created on first use
pub fn data_dir() -> Option<PathBuf> {
    let dir = home_dir()?.join(".pseudosh");
    if !dir.exists() {
        let _ = fs::create_dir_all(&dir);
    }
    Some(dir)
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.listen, "127.0.0.1:7878");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.fetch.max_body_bytes, 1024 * 1024);
        assert_eq!(config.client.server, "http://127.0.0.1:7878");
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config =
            toml::from_str("[server]\nlisten = \"0.0.0.0:9000\"\n").expect("parse");
        assert_eq!(config.server.listen, "0.0.0.0:9000");
        assert_eq!(config.fetch.timeout_secs, 10);
        assert_eq!(config.client.server, "http://127.0.0.1:7878");
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let config: Config = toml::from_str("").expect("parse");
        assert_eq!(config.server.listen, "127.0.0.1:7878");
    }
}
