//! Habit Tracker Backend
//!
//! HTTP service over the shared tracker core: daily log with an adaptive
//! step goal, body measurements, statistics and the admin overview.
//! Storage is the in-memory store; time comes from the system clock.

use anyhow::Result;
use habit_tracker_backend::{config::AppConfig, routes, state::AppState, telemetry};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::load()?;
    let production = AppConfig::is_production();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if production { "production" } else { "development" },
        base_steps = config.tracker.default_base_steps,
        "Starting Habit Tracker Backend"
    );

    if production {
        check_config(&config)?;
    }

    let metrics = if config.metrics.enabled {
        Some(telemetry::install_recorder()?)
    } else {
        info!("Metrics disabled, /metrics will answer 404");
        None
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = routes::create_router(AppState::in_memory(config, metrics));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` wins; otherwise debug for this crate outside production
fn init_tracing() {
    let default_filter = if AppConfig::is_production() {
        "habit_tracker_backend=info,tower_http=info"
    } else {
        "habit_tracker_backend=debug,tower_http=debug"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if AppConfig::is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().pretty()).init();
    }
}

/// Refuse to start production with unusable tracker defaults
fn check_config(config: &AppConfig) -> Result<()> {
    let errors = config.validate();
    for err in &errors {
        error!("Configuration error: {}", err);
    }
    if !errors.is_empty() {
        anyhow::bail!("Invalid production configuration");
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting graceful shutdown"),
        _ = terminate => info!("Received SIGTERM, starting graceful shutdown"),
    }
}
