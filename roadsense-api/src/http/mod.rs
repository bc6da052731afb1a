// Module: http
// HTTP/JSON REST API plus the WebSocket push channel

pub mod error;
pub mod health;
pub mod telemetry;
pub mod websocket;

use axum::{
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use roadsense_core::service::{SubscriberHub, TelemetryService};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub telemetry: Arc<TelemetryService>,
    pub hub: Arc<SubscriberHub>,
}

/// Create the HTTP router with all routes
pub fn create_router(telemetry: Arc<TelemetryService>, hub: Arc<SubscriberHub>) -> axum::Router {
    let state = AppState { telemetry, hub };

    let router = Router::new()
        // Health check endpoint (for monitoring probes)
        .merge(health::create_health_router())
        // Telemetry CRUD routes
        .route(
            "/processed_agent_data/",
            get(telemetry::list_telemetry).post(telemetry::create_telemetry),
        )
        .route(
            "/processed_agent_data/{id}",
            get(telemetry::get_telemetry)
                .put(telemetry::update_telemetry)
                .delete(telemetry::delete_telemetry),
        )
        // WebSocket endpoint for real-time notifications
        .route("/ws/", get(websocket::websocket_handler));

    // Apply layers before state
    let router = router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}
