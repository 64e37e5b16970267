use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bhavya::application::services::BreathingController;
use bhavya::application::use_cases::TokenSessionUseCase;
use bhavya::domain::entities::TechniqueCatalog;
use bhavya::infrastructure::{
    AppConfig, CliArgs, KeyringTokenStorage, StorageManager, WellnessApiClient,
};
use bhavya::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

/// Everything `main` needs once configuration and wiring are done.
struct Startup {
    app: App,
    session: TokenSessionUseCase,
    cli_token: Option<String>,
    logout: bool,
}

fn create_app() -> Result<Startup> {
    let args = CliArgs::parse();
    let mut config = load_config(args)?;
    let cli_token = config.token.take();

    init_logging(&config)?;
    config.sanitize();

    info!(version = bhavya::VERSION, api = %config.api.base_url, "Starting Bhavya");

    let catalog = TechniqueCatalog::with_custom(config.breathing.techniques.clone());
    let initial = config.breathing.default_technique.as_deref();
    if let Some(id) = initial
        && catalog.get(id).is_none()
    {
        warn!(technique = id, "Unknown default technique, using the first one");
    }
    let breathing = BreathingController::new(catalog, initial, config.breathing.session());

    let api = Arc::new(WellnessApiClient::new(
        config.api.base_url.clone(),
        config.api.timeout(),
    )?);
    let token_storage = Arc::new(KeyringTokenStorage::new());
    let session = TokenSessionUseCase::new(token_storage.clone());

    let app = App::new(api, token_storage, breathing, &config.ui)
        .with_token_persistence(config.api.remember_token);

    Ok(Startup {
        app,
        session,
        cli_token,
        logout: config.logout,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let startup = create_app()?;

    if startup.logout {
        startup.session.forget().await?;
        println!("Removed the stored token from the system keyring.");
        if startup.cli_token.is_none() {
            return Ok(());
        }
    }

    let mut terminal = ratatui::init();

    let result = startup.app.run(&mut terminal, startup.cli_token).await;

    ratatui::restore();

    result
}
