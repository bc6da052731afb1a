//! Server lifecycle management
//!
//! Starts the HTTP/WebSocket server and coordinates graceful shutdown.

use std::sync::Arc;
use tracing::{error, info};

use roadsense_api::http::create_router;
use roadsense_core::{
    service::{SubscriberHub, TelemetryService},
    Config,
};

/// Roadsense server - owns the configuration and shared services
pub struct RoadsenseServer {
    config: Config,
    telemetry: Arc<TelemetryService>,
    hub: Arc<SubscriberHub>,
}

impl RoadsenseServer {
    /// Create a new server instance
    pub const fn new(
        config: Config,
        telemetry: Arc<TelemetryService>,
        hub: Arc<SubscriberHub>,
    ) -> Self {
        Self {
            config,
            telemetry,
            hub,
        }
    }

    /// Start the HTTP server and wait for a shutdown signal
    pub async fn start(self) -> anyhow::Result<()> {
        let router = create_router(self.telemetry.clone(), self.hub.clone());

        let addr = self.config.http_address();
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            error!("Failed to bind {}: {}", addr, e);
            anyhow::anyhow!("Failed to bind {addr}: {e}")
        })?;
        info!("HTTP server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!(
            remaining_subscribers = self.hub.subscriber_count(),
            "HTTP server stopped"
        );
        Ok(())
    }
}

/// Resolve when the process receives Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C, starting graceful shutdown"); }
        () = terminate => { info!("Received SIGTERM, starting graceful shutdown"); }
    }
}
