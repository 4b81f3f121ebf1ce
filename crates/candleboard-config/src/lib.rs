//! Configuration management for candleboard.
//!
//! Loads configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub api: ApiConfig,
    pub miner: MinerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            api: ApiConfig::default(),
            miner: MinerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from default locations.
    ///
    /// Searches in order:
    /// 1. `./config.toml`
    /// 2. `~/.config/candleboard/config.toml`
    ///
    /// Returns default config if no file found.
    pub fn load_default() -> Self {
        // Try current directory first
        if let Ok(config) = Self::load("config.toml") {
            return config;
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("candleboard").join("config.toml");
            if let Ok(config) = Self::load(&config_path) {
                return config;
            }
        }

        // Return defaults
        Self::default()
    }

    /// Save configuration to a file path.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from("config.toml")
    }
}

/// General application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Root directory for cached candle data.
    pub data_dir: PathBuf,
    /// Markets to mine. Empty means every market in the catalog.
    pub markets: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            markets: Vec::new(),
        }
    }
}

/// API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Upbit REST base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Requests allowed per second.
    pub requests_per_sec: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.upbit.com".to_string(),
            timeout_secs: 30,
            requests_per_sec: 8,
        }
    }
}

/// Miner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    /// Delay between candle pages in milliseconds.
    pub page_delay_ms: u64,
    /// Delay before retrying a short page in milliseconds.
    pub retry_delay_ms: u64,
    /// Delay between (market, period) tasks in milliseconds.
    pub task_delay_ms: u64,
    /// Candles per chunk file.
    pub chunk_size: usize,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            page_delay_ms: 125,
            retry_delay_ms: 1_000,
            task_delay_ms: 500,
            chunk_size: 10_000,
        }
    }
}
