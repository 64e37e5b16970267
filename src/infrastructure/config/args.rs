use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "bhavya",
    version,
    about = "Guided breathing, journaling and check-ins in your terminal",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Backend base URL, including the `/api` prefix.
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Backend bearer token. The system keyring takes precedence.
    #[arg(long, env = "BHAVYA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Save a command-line token to the system keyring once the backend accepts it.
    #[arg(long)]
    pub remember_token: Option<bool>,

    /// Remove the token stored in the system keyring.
    #[arg(long)]
    pub logout: bool,

    /// Breathing technique selected at startup.
    #[arg(short, long, value_name = "ID")]
    pub technique: Option<String>,

    /// Breathing session target in minutes.
    #[arg(long, value_name = "MINUTES")]
    pub session_minutes: Option<u64>,

    /// Accent color (name or hex code).
    #[arg(long)]
    pub accent_color: Option<String>,
}
