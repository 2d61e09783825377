//! Configuration management for the Ramadan app backend
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::IftarError;
use crate::prayer_times::TimeLocale;
use crate::season::SeasonWindow;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Prayer times lookup settings
    pub prayer_times: PrayerTimesConfig,
    /// Image generation settings
    pub generation: GenerationConfig,
    /// Database settings
    pub database: DatabaseConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `index.html`, `loading.html` and assets
    pub static_dir: String,
}

/// Prayer times API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrayerTimesConfig {
    /// Base URL of the Aladhan API
    pub base_url: String,
    /// Calculation method id (4 = Umm al-Qura, Makkah)
    pub method: u8,
    /// Juristic school id (0 = Shafi)
    pub school: u8,
    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
    /// Maximum number of days returned per request
    pub max_days: usize,
    /// Maximum number of countries fetched concurrently
    pub max_concurrency: usize,
    /// IANA timezone used to decide what "today" is
    pub timezone: String,
    /// Language of the AM/PM markers
    pub locale: TimeLocale,
    /// Season windows overriding the built-in table
    pub seasons: Vec<SeasonOverride>,
}

/// A configured season window for one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonOverride {
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Image generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Image returned by the placeholder provider
    pub placeholder_url: String,
    /// Maximum accepted prompt length in characters
    pub max_prompt_length: usize,
}

/// Database settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// MySQL connection URL; generations are not persisted when absent
    pub url: Option<String>,
    pub max_connections: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: "static".to_string(),
        }
    }
}

impl Default for PrayerTimesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.aladhan.com".to_string(),
            method: 4,
            school: 0,
            timeout_seconds: 4,
            max_days: 7,
            max_concurrency: 25,
            timezone: "UTC".to_string(),
            locale: TimeLocale::Arabic,
            seasons: Vec::new(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            placeholder_url: "https://via.placeholder.com/512x512/9C6644/EDE0D4?text=AI+Image+Generation+Not+Configured".to_string(),
            max_prompt_length: 1000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl PrayerTimesConfig {
    /// Parsed timezone
    pub fn tz(&self) -> std::result::Result<Tz, IftarError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| IftarError::config(format!("Unknown timezone '{}'", self.timezone)))
    }

    /// Season overrides as windows
    #[must_use]
    pub fn season_windows(&self) -> Vec<(i32, SeasonWindow)> {
        self.seasons
            .iter()
            .map(|s| (s.year, SeasonWindow::new(s.start, s.end)))
            .collect()
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(env::var("IFTAR_CONFIG").ok().map(PathBuf::from))
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // IFTAR__PRAYER_TIMES__TIMEOUT_SECONDS=5
        builder = builder.add_source(
            Environment::with_prefix("IFTAR")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.database.url.is_none() {
            config.database.url = env::var("DATABASE_URL").ok().filter(|u| !u.is_empty());
        }

        config.validate()?;

        Ok(config)
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_seasons()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        let prayer = &self.prayer_times;

        if prayer.timeout_seconds == 0 || prayer.timeout_seconds > 60 {
            return Err(
                IftarError::config("Prayer times timeout must be between 1 and 60 seconds").into(),
            );
        }

        if prayer.max_days == 0 || prayer.max_days > 31 {
            return Err(IftarError::config("max_days must be between 1 and 31").into());
        }

        if prayer.max_concurrency == 0 || prayer.max_concurrency > 100 {
            return Err(IftarError::config("max_concurrency must be between 1 and 100").into());
        }

        if self.generation.max_prompt_length == 0 {
            return Err(IftarError::config("max_prompt_length cannot be zero").into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(IftarError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(IftarError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let base_url = &self.prayer_times.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(
                IftarError::config("Prayer times base URL must be a valid HTTP or HTTPS URL")
                    .into(),
            );
        }

        self.prayer_times.tz()?;

        Ok(())
    }

    fn validate_seasons(&self) -> Result<()> {
        for season in &self.prayer_times.seasons {
            if season.start > season.end {
                return Err(IftarError::config(format!(
                    "Season {} starts ({}) after it ends ({})",
                    season.year, season.start, season.end
                ))
                .into());
            }
        }
        Ok(())
    }
}
