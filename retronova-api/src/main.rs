//! Retronova API server
//!
//! Loads configuration, connects to PostgreSQL, applies migrations and serves
//! the REST API until Ctrl+C or SIGTERM.

use anyhow::{Context, Result};
use clap::Parser;
use retronova_api::{
    api, AppConfig, ApiState, InMemoryStorage, PostgresStorage, Storage,
};
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "retronova-api")]
#[command(about = "Retronova arcade backend")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "retronova.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Keep all data in memory instead of PostgreSQL
    #[arg(long)]
    in_memory: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_found = Path::new(&cli.config).exists();
    let mut config = if config_found {
        AppConfig::from_file(&cli.config)?
    } else {
        AppConfig::default()
    };
    config.apply_env();

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    if let Some(bind) = cli.bind {
        config.api.bind_address = bind;
    }

    init_logging(&config);

    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting Retronova API");
    config.validate_all(!cli.in_memory)?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let storage: Arc<dyn Storage> = if cli.in_memory {
        warn!("Using in-memory storage; data is lost on shutdown");
        Arc::new(InMemoryStorage::new())
    } else {
        info!("Connecting to PostgreSQL...");
        let postgres = PostgresStorage::connect(&config.database)
            .await
            .context("Failed to connect to PostgreSQL")?;
        if config.database.run_migrations {
            postgres.migrate().await.context("Failed to run migrations")?;
        }
        Arc::new(postgres)
    };

    api::start_server(ApiState::new(storage), &config.api, shutdown_signal()).await?;

    info!("Shutting down Retronova API");
    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.monitoring.log_level;
        format!("retronova_api={level},tower_http={level},sqlx=warn").into()
    });

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
