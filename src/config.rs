//! Configuration module for the sentiment client
//!
//! Handles configuration loading from TOML files and environment variables,
//! and provides structured configuration types. The bearer token is never
//! stored in the TOML; it is read from `SENTIMENT_API_TOKEN`.

use serde::{Deserialize, Serialize};

/// Environment variable holding the bearer token for all gateway requests
pub const TOKEN_ENV_VAR: &str = "SENTIMENT_API_TOKEN";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote gateway configuration
    pub gateway: GatewayConfig,

    /// Table/pagination configuration
    #[serde(default)]
    pub table: TableConfig,

    /// Avatar prefetch configuration
    #[serde(default)]
    pub avatars: AvatarConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the backend API (no trailing slash)
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Rows per page on desktop-class viewports
    #[serde(default = "default_desktop_page_size")]
    pub desktop_page_size: usize,

    /// Rows per page on mobile-class viewports
    #[serde(default = "default_mobile_page_size")]
    pub mobile_page_size: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            desktop_page_size: default_desktop_page_size(),
            mobile_page_size: default_mobile_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// Enable fire-and-forget warming of the next page's avatar URLs
    #[serde(default = "default_true")]
    pub preload_enabled: bool,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            preload_enabled: default_true(),
        }
    }
}

// Default value functions
fn default_timeout() -> u64 {
    15
}
fn default_desktop_page_size() -> usize {
    10
}
fn default_mobile_page_size() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with `.env` overlay applied first
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }

    /// Read the bearer token from the environment, if present
    pub fn token_from_env() -> Option<String> {
        std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                base_url: "http://localhost:4000/api".to_string(),
                timeout_secs: default_timeout(),
            },
            table: TableConfig::default(),
            avatars: AvatarConfig::default(),
        }
    }
}
