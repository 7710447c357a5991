//! # Cozy Gym Bot Main Entry Point
//!
//! Initializes logging, loads configuration, connects the database, starts
//! the auto-sync scheduler and serves the HTTP API until Ctrl-C.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cozy_gym_bot::api::{self, AppState};
use cozy_gym_bot::config::Config;
use cozy_gym_bot::database::connection::DatabaseManager;
use cozy_gym_bot::services::google::{CalendarApi, GoogleClient};
use cozy_gym_bot::services::notifier::{Notifier, TelegramNotifier};
use cozy_gym_bot::services::scheduler::SyncScheduler;
use cozy_gym_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cozy_gym_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    info!("Starting Cozy Gym Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database configured: {}, HTTP Port: {}",
        config.database_url.is_some(),
        config.http_port
    );

    let db = match &config.database_url {
        Some(url) => {
            info!("Initializing database connection...");
            let db = DatabaseManager::new(url).await?;
            if config.auto_migrate {
                db.run_migrations().await?;
            } else {
                info!("AUTO_MIGRATE is disabled; skipping migrations");
            }
            Some(db)
        }
        None => {
            tracing::error!("DATABASE_URL is not configured; scheduler is disabled");
            None
        }
    };

    let notifier: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(&config.telegram_bot_token));
    let calendar: Arc<dyn CalendarApi> = Arc::new(GoogleClient::new(config.google_oauth())?);
    let state = AppState::new(config.clone(), db, calendar, notifier);

    // Initialize and start the auto-sync scheduler
    let mut scheduler = match &state.db {
        Some(db) => {
            let mut scheduler = SyncScheduler::new(db.clone(), state.sync.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create sync scheduler: {}", e))?;
            scheduler
                .start()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to start sync scheduler: {}", e))?;
            Some(scheduler)
        }
        None => None,
    };

    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;
    log_system_event("HTTP server listening", Some(&format!("port {}", config.http_port)));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.stop().await {
            tracing::warn!("Error stopping sync scheduler: {}", e);
        }
    }

    info!("Application stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        return;
    }
    log_system_event("Shutdown signal received", None);
}
