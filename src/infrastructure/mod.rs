//! Infrastructure layer with external service adapters.

/// Wellness backend REST client.
pub mod api;
/// Application configuration.
pub mod config;
/// Token storage adapters.
pub mod storage;

pub use api::WellnessApiClient;
pub use config::{AppConfig, CliArgs, ConfigError, LogLevel, StorageManager};
pub use storage::KeyringTokenStorage;
