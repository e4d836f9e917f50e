use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use conch_backend::{auth::rate_limit::CLEANUP_INTERVAL, config::Settings, router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// conch account and invoice API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the TOML settings file
    #[arg(short, long, default_value = conch_backend::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load_from(&cli.config)?;
    init_tracing(&settings);

    let addr = settings.bind_addr()?;
    tracing::info!(
        config = %cli.config.display(),
        storage = ?settings.storage.backend,
        "starting conch"
    );

    let state = Arc::new(AppState::from_settings(settings).context("failed to build app state")?);
    state.rate_limiter.spawn_cleanup(CLEANUP_INTERVAL);
    let app = router::create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
