mod server;

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use roadsense_core::{
    bootstrap::{init_database, load_config},
    logging,
    repository::TelemetryRepository,
    service::{SubscriberHub, TelemetryNotifier, TelemetryService},
};

use server::RoadsenseServer;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load and validate configuration
    let config = load_config()?;

    // 2. Initialize logging
    logging::init_logging(&config.logging)?;
    info!("Roadsense server starting...");
    info!("HTTP address: {}", config.http_address());

    // 3. Initialize database
    let pool = init_database(&config).await?;

    // 4. Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../migrations")
        .run(&pool)
        .await
        .map_err(|e| {
            error!("Failed to run migrations: {}", e);
            anyhow::anyhow!("Migration failed: {e}")
        })?;
    info!("Migrations completed");

    // 5. Wire services: one hub for the process lifetime, shared by the
    //    dispatcher and the WebSocket layer
    let hub = Arc::new(SubscriberHub::new());
    let notifier = TelemetryNotifier::new(hub.clone());
    let repository = TelemetryRepository::new(pool);
    let telemetry = Arc::new(TelemetryService::new(repository, notifier));
    info!("Services initialized");

    // 6. Start the HTTP server and wait for shutdown
    let server = RoadsenseServer::new(config, telemetry, hub);
    server.start().await
}
