//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the kite-config.toml file.
//! It provides a centralized way to configure the spot catalog location, the forecast
//! provider, report hours and the Telegram destination.
//!
//! Credentials are never stored in the file. The file only names the environment
//! variables that hold them (`OWM_API_KEY`, `TELEGRAM_TOKEN`, `CHAT_ID` by default).

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file, looked up in the working directory
pub const CONFIG_FILE: &str = "kite-config.toml";

/// Application configuration loaded from kite-config.toml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Spot catalog location
    pub catalog: CatalogConfig,
    /// Forecast provider settings
    pub forecast: ForecastConfig,
    /// Report composition settings
    pub report: ReportConfig,
    /// Telegram delivery settings
    pub telegram: TelegramConfig,
}

/// Spot catalog configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Path to the CSV spot catalog
    pub path: PathBuf,
}

/// Forecast provider configuration (OpenWeatherMap 5-day / 3-hour API)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecast endpoint, queried with `lat`, `lon`, `appid` and `units=metric`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum number of forecast requests in one run
    pub fetch_quota: usize,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

/// Report composition configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Banner title at the top of each report
    pub title: String,
    /// UTC hours of day shown in the detailed report
    pub target_hours: Vec<u32>,
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot API root; the bot token and method are appended
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Environment variable holding the bot token
    pub token_env: String,
    /// Environment variable holding the destination chat id
    pub chat_id_env: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            path: PathBuf::from("spots.csv"),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            base_url: "https://api.openweathermap.org/data/2.5/forecast".to_string(),
            timeout_secs: 10,
            fetch_quota: 20,
            api_key_env: "OWM_API_KEY".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            title: "Kite Alert".to_string(),
            // Forecast steps are 3-hourly, so these line up with real samples
            target_hours: vec![9, 12, 15, 18],
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        TelegramConfig {
            base_url: "https://api.telegram.org".to_string(),
            timeout_secs: 10,
            token_env: "TELEGRAM_TOKEN".to_string(),
            chat_id_env: "CHAT_ID".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from kite-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        "⚙️  Loaded configuration from {} (catalog: {})",
                        path.as_ref().display(),
                        config.catalog.path.display()
                    );
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Forecast API key from the configured environment variable, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        non_empty_env(&self.forecast.api_key_env)
    }

    /// Telegram `(token, chat_id)` from the configured environment variables.
    /// Returns `None` unless both are present.
    pub fn telegram_credentials(&self) -> Option<(String, String)> {
        let token = non_empty_env(&self.telegram.token_env)?;
        let chat_id = non_empty_env(&self.telegram.chat_id_env)?;
        Some((token, chat_id))
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
