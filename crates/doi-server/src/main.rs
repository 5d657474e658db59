//! Entry point for the doi-server binary.

use std::sync::Arc;

use doi_resolver::{AdmissionGate, CrossrefClient, JournalResolver};
use doi_server::{build_app, config::ServerConfig, state::AppState};
use doi_store::{JournalRepository, MemoryRepository, PgJournalStore, StoreConfig};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    tracing::info!("Starting doi-server");
    tracing::info!(
        port = config.port,
        log_level = %config.log_level,
        lease_ms = config.lease_duration.as_millis() as u64,
        registry = %config.crossref_base_url,
        "Configuration loaded"
    );

    let repository = connect_repository(&config).await?;
    let metadata = CrossrefClient::new(config.crossref())?;
    let resolver = JournalResolver::new(
        repository,
        Arc::new(metadata),
        AdmissionGate::new(config.lease_duration),
    );

    // Build application state and router with middleware
    let addr = config.socket_addr();
    let app = build_app(AppState::new(resolver, config))?;

    // Create listener
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise a process-local repository.
async fn connect_repository(
    config: &ServerConfig,
) -> Result<Arc<dyn JournalRepository>, Box<dyn std::error::Error>> {
    match &config.database_url {
        Some(database_url) => {
            let store_config = StoreConfig {
                database_url: database_url.clone(),
                base_uri: config.repository_base_uri.clone(),
                ..StoreConfig::from_env()?
            };
            let store = PgJournalStore::connect(store_config).await?;
            tracing::info!("Connected to database");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; journals are kept in memory only");
            Ok(Arc::new(MemoryRepository::with_base_uri(
                &config.repository_base_uri,
            )))
        }
    }
}

/// Initialize the tracing subscriber.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
