//! Telemetry CRUD HTTP endpoints
//!
//! REST API for ingesting, reading, replacing and deleting telemetry
//! records. Batch ingest and update fan out to WebSocket observers through
//! the core service; delivery never affects the HTTP response.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::http::error::{AppError, AppResult};
use crate::http::AppState;
use roadsense_core::models::{TelemetryInput, TelemetryRecord};
use roadsense_core::Error;

/// Status body returned by ingest and delete
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

/// POST /processed_agent_data/ - ingest a batch of telemetry records
pub async fn create_telemetry(
    State(state): State<AppState>,
    Json(batch): Json<Vec<TelemetryInput>>,
) -> AppResult<Json<StatusResponse>> {
    let receipt = state.telemetry.ingest(batch).await.map_err(|err| match err {
        Error::InvalidInput(msg) => AppError::bad_request(msg),
        other => {
            error!(error = %other, "Telemetry batch ingest failed");
            AppError::internal("data create failed")
        }
    })?;

    debug!(committed = receipt.committed(), "Batch ingest acknowledged");
    Ok(Json(StatusResponse {
        status: "data added successfully",
    }))
}

/// GET /processed_agent_data/{id} - fetch one record
pub async fn get_telemetry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TelemetryRecord>> {
    let record = state.telemetry.get(id).await?;
    Ok(Json(record))
}

/// GET /processed_agent_data/ - fetch every record
pub async fn list_telemetry(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<TelemetryRecord>>> {
    let records = state.telemetry.list().await?;
    Ok(Json(records))
}

/// PUT /processed_agent_data/{id} - replace one record in full
pub async fn update_telemetry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<TelemetryInput>,
) -> AppResult<Json<TelemetryRecord>> {
    let record = state.telemetry.update(id, input).await?;
    Ok(Json(record))
}

/// DELETE /processed_agent_data/{id} - delete one record (idempotent)
pub async fn delete_telemetry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<StatusResponse>> {
    state.telemetry.delete(id).await?;
    Ok(Json(StatusResponse {
        status: "data deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_bodies_match_wire_contract() {
        let added = serde_json::to_value(StatusResponse {
            status: "data added successfully",
        })
        .expect("serializable");
        assert_eq!(
            added,
            serde_json::json!({"status": "data added successfully"})
        );

        let deleted = serde_json::to_value(StatusResponse {
            status: "data deleted successfully",
        })
        .expect("serializable");
        assert_eq!(
            deleted,
            serde_json::json!({"status": "data deleted successfully"})
        );
    }
}
