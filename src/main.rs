//! Room Directory Server
//!
//! REST API server for searching campus rooms.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use room_directory::{
    api,
    config::{AppConfig, DatabaseConfig, LoggingConfig, StorageBackend, StorageConfig},
    repository::{Catalog, InMemoryRoomStore, PgRoomStore, RoomStore},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting Room Directory v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config.storage, &config.database).await?;

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        services: Arc::new(Services::new(store)),
    };

    // Build router
    let app = api::create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("room_directory={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);

    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn open_store(
    storage: &StorageConfig,
    database: &DatabaseConfig,
) -> anyhow::Result<Arc<dyn RoomStore>> {
    match storage.backend {
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .min_connections(database.min_connections)
                .connect(&database.url)
                .await
                .context("Failed to connect to database")?;

            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;

            tracing::info!("Database migrations completed");

            Ok(Arc::new(PgRoomStore::new(pool)))
        }
        StorageBackend::Memory => {
            let catalog = match storage.seed_file {
                Some(ref path) => Catalog::from_json_file(path)?,
                None => Catalog::default(),
            };

            tracing::info!(
                "Using in-memory store: {} buildings, {} features, {} rooms",
                catalog.buildings.len(),
                catalog.features.len(),
                catalog.rooms.len()
            );

            Ok(Arc::new(InMemoryRoomStore::new(catalog)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
