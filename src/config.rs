//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `FXSESSION__SECTION__KEY` environment variables. The provider
//! API key also falls back to `TWELVE_DATA_KEY`.

use crate::api::RetryPolicy;
use crate::models::{Instrument, Timeframe};
use crate::summary::DEFAULT_PRIORITY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file looked up (without extension) when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "config/fxsession";
pub const ENV_PREFIX: &str = "FXSESSION";
pub const API_KEY_ENV: &str = "TWELVE_DATA_KEY";

/// Pairs tracked by default
pub const DEFAULT_ASSETS: [&str; 27] = [
    "EUR/USD", "GBP/USD", "USD/JPY", "USD/CHF", "AUD/USD", "USD/CAD", "NZD/USD", "EUR/GBP",
    "EUR/JPY", "EUR/CHF", "EUR/AUD", "EUR/CAD", "EUR/NZD", "GBP/JPY", "GBP/CHF", "GBP/AUD",
    "GBP/CAD", "GBP/NZD", "AUD/JPY", "AUD/CHF", "AUD/CAD", "AUD/NZD", "CAD/JPY", "CAD/CHF",
    "CHF/JPY", "NZD/JPY", "NZD/CHF",
];

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub retry: RetryPolicy,
    pub cache: CacheConfig,
    pub refresh: RefreshConfig,
    pub logging: LoggingConfig,
    pub display: DisplayConfig,
    pub assets: Vec<String>,
    pub timeframes: Vec<Timeframe>,
    pub priority: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            retry: RetryPolicy::default(),
            cache: CacheConfig::default(),
            refresh: RefreshConfig::default(),
            logging: LoggingConfig::default(),
            display: DisplayConfig::default(),
            assets: DEFAULT_ASSETS.iter().map(|s| s.to_string()).collect(),
            timeframes: vec![Timeframe::Daily, Timeframe::FourHour, Timeframe::FiveMinute],
            priority: DEFAULT_PRIORITY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Twelve Data connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    /// Bars requested per series
    pub output_size: u32,
    pub timeout_secs: u64,
    pub requests_per_minute: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.twelvedata.com".to_string(),
            api_key: String::new(),
            output_size: 200,
            timeout_secs: 30,
            requests_per_minute: 8, // free tier
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 1800 }
    }
}

/// Wall-clock refresh times for `watch`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// `HH:MM` times in `timezone`
    pub times: Vec<String>,
    pub timezone: String,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            times: ["06:05", "07:05", "11:05", "13:05", "15:05", "19:05"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            timezone: "Asia/Hong_Kong".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber` env-filter directive, overridden by `RUST_LOG`
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "fxsession=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Zone for the "last refreshed" caption
    pub timezone: String,
    pub color: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            timezone: "Asia/Hong_Kong".to_string(),
            color: true,
        }
    }
}

/// Keys whose environment values are comma-separated lists
const ENV_LIST_KEYS: [&str; 4] = ["assets", "timeframes", "priority", "refresh.times"];

/// `FXSESSION__SECTION__KEY` variables, with list keys split on commas
fn environment() -> config::Environment {
    ENV_LIST_KEYS.iter().fold(
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(","),
        |env, key| env.with_list_parse_key(key),
    )
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut app = Self::from_sources(path, environment())?;

        if app.provider.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                app.provider.api_key = key;
            }
        }

        app.validate()?;
        Ok(app)
    }

    fn from_sources(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Check settings that would otherwise fail at refresh time
    pub fn validate(&self) -> Result<()> {
        self.instruments()?;

        if self.provider.output_size == 0 {
            anyhow::bail!("provider.output_size must be positive");
        }

        for required in [Timeframe::Daily, Timeframe::FiveMinute] {
            if !self.timeframes.contains(&required) {
                anyhow::bail!(
                    "timeframes must include {} (rows cannot be built without it)",
                    required
                );
            }
        }

        Ok(())
    }

    /// Configured assets as instruments, in configured order
    pub fn instruments(&self) -> Result<Vec<Instrument>> {
        self.assets
            .iter()
            .map(|a| {
                a.parse::<Instrument>()
                    .map_err(|e| anyhow::anyhow!(e))
                    .with_context(|| format!("Invalid asset in configuration: {}", a))
            })
            .collect()
    }
}
