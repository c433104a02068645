//! shelf-catalog - Book catalog enrichment service
//!
//! Serves the configured book list, enriching each title from the Open Library
//! API and caching enriched records in SQLite.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use shelf_catalog::db::{BookStore, SqliteBookStore};
use shelf_catalog::services::{Catalog, MetadataFetcher, OpenLibraryClient, Reconciler};
use shelf_catalog::{build_router, AppState};
use shelf_common::config::{CatalogConfig, ConfigOverrides};
use shelf_common::db::init_database;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for shelf-catalog
#[derive(Parser, Debug)]
#[command(name = "shelf-catalog")]
#[command(about = "Book catalog enrichment service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "SHELF_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, env = "SHELF_DATABASE_PATH")]
    database: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:3000
    #[arg(short, long, env = "SHELF_BIND_ADDRESS")]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = CatalogConfig::resolve(&ConfigOverrides {
        config_file: args.config,
        database_path: args.database,
        bind_address: args.bind,
    })
    .context("Failed to resolve configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("shelf_catalog={0},shelf_common={0},tower_http=info", config.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting shelf-catalog v{} on {}",
        env!("CARGO_PKG_VERSION"),
        config.bind_address
    );
    info!("Database path: {}", config.database_path.display());
    info!(
        base_url = %config.openlibrary_base_url,
        timeout_secs = config.request_timeout_secs,
        max_concurrent = config.max_concurrent_fetches,
        seeds = config.seeds.len(),
        "Enrichment settings"
    );

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let client = OpenLibraryClient::from_config(&config)
        .context("Failed to build Open Library client")?;
    let store: Arc<dyn BookStore> = Arc::new(SqliteBookStore::new(pool));
    let reconciler = Reconciler::new(store.clone(), Arc::new(MetadataFetcher::new(client)));
    let catalog = Catalog::new(
        store,
        reconciler,
        config.seeds.clone(),
        config.max_concurrent_fetches,
    );

    let app = build_router(AppState::new(Arc::new(catalog)));

    let listener = tokio::net::TcpListener::bind(config.bind_address.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    info!("Listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolve when Ctrl+C or SIGTERM arrives
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
