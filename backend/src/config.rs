//! Application configuration.
//!
//! Settings come from an optional `countdown.toml` file and are then
//! overridden by environment variables:
//!
//! - `HOST`, `PORT`: bind address (default `0.0.0.0:8080`)
//! - `APP_ENV`: `development` enables dev mode (default `production`)
//! - `ANNIVERSARY_MONTH`, `ANNIVERSARY_DAY`: the date (default May 25)
//! - `ANNIVERSARY_OFFSET_MINUTES`: civil offset from UTC (default +330)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::models::{AnniversaryClock, ClockConfigError};

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },

    #[error(transparent)]
    Clock(#[from] ClockConfigError),
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub anniversary: AnniversarySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnniversarySettings {
    #[serde(default = "default_month")]
    pub month: u32,
    #[serde(default = "default_day")]
    pub day: u32,
    #[serde(default = "default_offset_minutes")]
    pub offset_minutes: i32,
    /// Name shown alongside the countdown.
    #[serde(default = "default_label")]
    pub label: String,
}

impl Default for AnniversarySettings {
    fn default() -> Self {
        Self {
            month: default_month(),
            day: default_day(),
            offset_minutes: default_offset_minutes(),
            label: default_label(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_month() -> u32 {
    5
}

fn default_day() -> u32 {
    25
}

// IST
fn default_offset_minutes() -> i32 {
    330
}

fn default_label() -> String {
    "Ducky".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `countdown.toml` from the current, `backend/` or parent
    /// directory if present, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("countdown.toml"),
            PathBuf::from("backend/countdown.toml"),
            PathBuf::from("../countdown.toml"),
        ];

        let mut config = match search_paths.iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.to_clock()?;
        Ok(config)
    }

    /// Override settings from environment variables.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("PORT")? {
            self.server.port = port;
        }
        if let Ok(value) = env::var("APP_ENV") {
            self.server.environment = value.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "APP_ENV".to_string(),
                value,
            })?;
        }
        if let Some(month) = parse_env("ANNIVERSARY_MONTH")? {
            self.anniversary.month = month;
        }
        if let Some(day) = parse_env("ANNIVERSARY_DAY")? {
            self.anniversary.day = day;
        }
        if let Some(offset) = parse_env("ANNIVERSARY_OFFSET_MINUTES")? {
            self.anniversary.offset_minutes = offset;
        }
        Ok(())
    }

    pub fn dev_mode(&self) -> bool {
        self.server.environment == Environment::Development
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Build the anniversary clock, validating date and offset.
    pub fn to_clock(&self) -> Result<AnniversaryClock, ClockConfigError> {
        AnniversaryClock::new(
            self.anniversary.month,
            self.anniversary.day,
            self.anniversary.offset_minutes,
        )
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv {
                key: key.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
