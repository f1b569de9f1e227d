//! Configuration System
//!
//! Timer, polling and notification settings shared by every front end.
//! With the `native` feature, configuration can also be loaded from TOML files
//! and environment variables.

use serde::Deserialize;
#[cfg(feature = "native")]
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub timer: TimerConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Origin of the StudyTrack web app; empty means same-origin (browser only)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Value of the backend's `session` cookie, for clients outside the browser
    #[serde(default)]
    pub session_cookie: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            session_cookie: None,
        }
    }
}

/// Countdown timer settings
#[derive(Debug, Clone, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,

    /// Longest accepted custom duration; the timer caps it at 180
    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,
}

fn default_minutes() -> u32 {
    25
}

fn default_max_minutes() -> u32 {
    180
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            max_minutes: default_max_minutes(),
        }
    }
}

/// Dashboard polling settings
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

fn default_poll_interval() -> u64 {
    30
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
        }
    }
}

/// Flash message lifetimes
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Lifetime of server-rendered flashes (ms)
    #[serde(default = "default_page_flash")]
    pub page_flash_ms: u64,

    /// Lifetime of runtime toasts (ms)
    #[serde(default = "default_toast")]
    pub toast_ms: u64,

    /// Opacity transition before removal (ms)
    #[serde(default = "default_fade")]
    pub fade_ms: u64,
}

fn default_page_flash() -> u64 {
    5000
}

fn default_toast() -> u64 {
    3000
}

fn default_fade() -> u64 {
    300
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            page_flash_ms: default_page_flash(),
            toast_ms: default_toast(),
            fade_ms: default_fade(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(feature = "native")]
impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus environment variable overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from the first default location that exists, else environment only
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("studytrack").join("config.toml")),
            Some(PathBuf::from("./studytrack.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STUDYTRACK_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(cookie) = std::env::var("STUDYTRACK_SESSION_COOKIE") {
            self.api.session_cookie = Some(cookie);
        }
        if let Ok(secs) = std::env::var("STUDYTRACK_POLL_SECS") {
            match secs.parse() {
                Ok(s) if s > 0 => self.dashboard.poll_interval_secs = s,
                _ => tracing::warn!("Ignoring invalid STUDYTRACK_POLL_SECS={}", secs),
            }
        }
        if let Ok(level) = std::env::var("STUDYTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STUDYTRACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io {
        path: std::path::PathBuf,
        error: String,
    },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse {
        path: std::path::PathBuf,
        error: String,
    },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# StudyTrack Configuration
#
# Environment variables override these settings:
# - STUDYTRACK_API_URL
# - STUDYTRACK_SESSION_COOKIE
# - STUDYTRACK_POLL_SECS
# - STUDYTRACK_LOG_LEVEL
# - STUDYTRACK_LOG_FORMAT

[api]
# Origin of the StudyTrack web app
base_url = "http://localhost:5000"

# Request timeout in seconds
request_timeout_secs = 10

# Signed-in session cookie copied from the browser
# session_cookie = ""

[timer]
# Duration selected when the timer page loads (minutes)
default_minutes = 25

# Longest accepted custom duration (minutes, at most 180)
max_minutes = 180

[dashboard]
# How often dashboard statistics are refreshed (seconds)
poll_interval_secs = 30

[notifications]
# Server-rendered flash lifetime (ms)
page_flash_ms = 5000

# Runtime toast lifetime (ms)
toast_ms = 3000

# Fade-out duration before removal (ms)
fade_ms = 300

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
