use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cardiograph::api::{create_router, AppState};
use cardiograph::config::AppConfig;
use cardiograph::data::ensure_dataset;
use cardiograph::error::Result;
use cardiograph::explain::NarrationTables;
use cardiograph::ml::{trainer, ModelArtifacts};

#[derive(Parser)]
#[command(name = "cardiograph", about = "Cardio risk prediction API")]
struct Cli {
    /// Configuration directory
    #[arg(long, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the prediction API (default)
    Serve,
    /// Train once, persist artifacts and exit
    Train,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)?;
    init_logging(&config.logging.level);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_serve(&config).await,
        Commands::Train => run_train(&config).await,
    }
}

async fn run_serve(config: &AppConfig) -> Result<()> {
    ensure_dataset(&config.dataset).await?;

    let artifacts =
        ModelArtifacts::load_or_train(&config.model, &config.training, &config.dataset.path)?;
    info!("model ready | accuracy: {:.4}", artifacts.accuracy);

    let tables = NarrationTables::load_or_default(config.model.narration_tables.as_deref())?;
    let state = AppState::new(artifacts, tables);
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete");
    Ok(())
}

async fn run_train(config: &AppConfig) -> Result<()> {
    ensure_dataset(&config.dataset).await?;
    let outcome = trainer::train_from_csv(&config.dataset.path, &config.training)?;
    outcome.persist(&config.model)?;
    info!(
        dir = %config.model.dir.display(),
        "artifacts persisted | accuracy: {:.4}",
        outcome.accuracy
    );
    Ok(())
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},cardiograph=debug")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
