//! Application configuration.

use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use super::args::CliArgs;
use crate::domain::entities::BreathingTechnique;

pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "bhavya";
pub(super) const APP_NAME: &str = "bhavya";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Configuration loaded from `config.toml`, then overridden by CLI flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Token passed on the command line. Never written to disk.
    #[serde(skip)]
    pub token: Option<String>,

    /// Clear the stored keyring token before starting.
    #[serde(skip)]
    pub logout: bool,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Backend connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Breathing session settings and custom techniques.
    #[serde(default)]
    pub breathing: BreathingConfig,

    /// UI configuration.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Keep an accepted `--token` in the system keyring for later runs.
    #[serde(default = "default_remember_token")]
    pub remember_token: bool,
}

impl ApiConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            remember_token: default_remember_token(),
        }
    }
}

/// Breathing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingConfig {
    /// Technique selected at startup.
    #[serde(default)]
    pub default_technique: Option<String>,

    /// Session target in minutes. `0` disables the target.
    #[serde(default = "default_session_minutes")]
    pub session_minutes: u64,

    /// Extra techniques appended after the built-in ones.
    #[serde(default)]
    pub techniques: Vec<BreathingTechnique>,
}

impl BreathingConfig {
    #[must_use]
    pub const fn session(&self) -> Duration {
        Duration::from_secs(self.session_minutes.saturating_mul(60))
    }
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            default_technique: None,
            session_minutes: default_session_minutes(),
            techniques: Vec::new(),
        }
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Accent color (name or hex code).
    #[serde(default = "default_accent_color")]
    pub accent_color: String,

    /// How long status messages stay visible, in seconds.
    #[serde(default = "default_status_duration")]
    pub status_duration: u64,

    /// Chat timestamp format (chrono format).
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl UiConfig {
    /// Replaces a timestamp format chrono cannot render with the default.
    pub fn sanitize(&mut self) {
        if !is_valid_timestamp_format(&self.timestamp_format) {
            warn!(
                format = %self.timestamp_format,
                "Invalid chat timestamp format, using the default"
            );
            self.timestamp_format = default_timestamp_format();
        }
    }
}

/// True when every specifier in `format` is one chrono understands.
#[must_use]
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            accent_color: default_accent_color(),
            status_duration: default_status_duration(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_remember_token() -> bool {
    true
}

const fn default_session_minutes() -> u64 {
    5
}

fn default_accent_color() -> String {
    "#13ecda".to_string()
}

const fn default_status_duration() -> u64 {
    4
}

fn default_timestamp_format() -> String {
    "%H:%M".to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_url) = args.api_url {
            self.api.base_url = api_url;
        }
        if let Some(token) = args.token {
            self.token = Some(token);
        }
        if let Some(remember) = args.remember_token {
            self.api.remember_token = remember;
        }
        self.logout = args.logout;
        if let Some(technique) = args.technique {
            self.breathing.default_technique = Some(technique);
        }
        if let Some(minutes) = args.session_minutes {
            self.breathing.session_minutes = minutes;
        }
        if let Some(accent_color) = args.accent_color {
            self.ui.accent_color = accent_color;
        }
    }

    /// Falls back to defaults for values that would fail at render time.
    pub fn sanitize(&mut self) {
        self.ui.sanitize();
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("bhavya.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            token: None,
            logout: false,
            log_level: LogLevel::Info,
            api: ApiConfig::default(),
            breathing: BreathingConfig::default(),
            ui: UiConfig::default(),
        }
    }
}
