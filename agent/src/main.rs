//! HealthSync Agent
//!
//! Periodically reads health metrics from a provider and forwards a daily
//! summary to the configured server.
//!
//! ## Architecture
//!
//! - Provider: abstract health-data source; a platform binding supplies the
//!   real records, the built-in in-memory provider keeps the agent runnable
//!   on hosts without one
//! - Reader: per-date aggregation into a metrics snapshot
//! - Sync: the orchestrator driving each attempt
//! - Scheduler: named single-flight periodic execution

use anyhow::Result;
use healthsync_agent::config::AppConfig;
use healthsync_agent::provider::{FakeProvider, HealthProvider};
use healthsync_agent::scheduler::JobScheduler;
use healthsync_agent::store::{shared, JsonFileStore, SettingsStore, SyncState};
use healthsync_agent::sync::SyncAgent;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the recurring sync job
const SYNC_JOB: &str = "healthsync";

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        "Starting HealthSync agent"
    );

    // Open the durable settings store and seed endpoint config into it
    let mut store = JsonFileStore::open(&config.store.path)
        .map_err(|e| anyhow::anyhow!("cannot open settings store: {e}"))?;
    seed_store(&mut store, &config)?;
    let store = shared(store);

    // Bind the health-data provider. There is no platform health store on
    // this host, so the in-memory provider stands in; a device build swaps
    // in its own `HealthProvider` implementation here.
    let provider: Arc<dyn HealthProvider> = Arc::new(FakeProvider::new());
    if !provider.is_available() {
        warn!("health provider reports unavailable; sync attempts will fail until fixed");
    }

    let agent = Arc::new(SyncAgent::new(
        provider,
        store,
        Duration::from_secs(config.sync.http_timeout_secs),
    )?);

    // The periodic job fires immediately once, which doubles as the
    // sync-on-startup the mobile client performed after boot
    let scheduler = JobScheduler::new();
    scheduler
        .schedule_periodic(
            SYNC_JOB,
            Duration::from_secs(config.sync.interval_minutes * 60),
            agent.clone(),
        )
        .await;
    info!(
        interval_minutes = config.sync.interval_minutes,
        "sync job scheduled"
    );

    shutdown_signal().await;

    scheduler.shutdown().await;
    let status = agent.status().await;
    info!(
        last_sync = status.last_sync.as_deref().unwrap_or("-"),
        "Agent shutdown complete"
    );
    Ok(())
}

/// Copy non-empty endpoint settings from config into the store, which stays
/// the single source the orchestrator reads
fn seed_store(store: &mut dyn SettingsStore, config: &AppConfig) -> Result<()> {
    let mut state = SyncState::new(store);
    if !config.server.url.trim().is_empty() {
        state
            .set_server_url(&config.server.url)
            .map_err(|e| anyhow::anyhow!("cannot seed server URL: {e}"))?;
    }
    if !config.server.token.trim().is_empty() {
        state
            .set_token(&config.server.token)
            .map_err(|e| anyhow::anyhow!("cannot seed token: {e}"))?;
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "healthsync_agent=info".into()
        } else {
            "healthsync_agent=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Graceful shutdown signal handler
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
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
