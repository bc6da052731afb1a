// HTTP error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for HTTP handlers
pub type AppResult<T> = Result<T, AppError>;

/// Application error with HTTP status code
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub detail: String,
}

impl AppError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn internal_server_error(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    // Convenience alias
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::internal_server_error(detail)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.detail)
    }
}

impl std::error::Error for AppError {}

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = Json(ErrorResponse {
            detail: self.detail,
        });

        (status, body).into_response()
    }
}

/// Convert roadsense_core errors to HTTP errors
impl From<roadsense_core::Error> for AppError {
    fn from(err: roadsense_core::Error) -> Self {
        use roadsense_core::Error;

        match err {
            Error::NotFound(msg) => AppError::not_found(msg),
            Error::InvalidInput(msg) => AppError::bad_request(msg),
            Error::Database(e) => {
                tracing::error!("Database error: {}", e);
                AppError::internal_server_error("internal error")
            }
            Error::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                AppError::internal_server_error("internal error")
            }
            Error::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                AppError::internal_server_error("internal error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roadsense_core::Error;

    #[test]
    fn test_not_found_maps_to_404_with_detail() {
        let err: AppError = Error::NotFound("data not exist".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.detail, "data not exist");
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let err: AppError = Error::InvalidInput("Invalid gps.latitude".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_error_is_not_leaked() {
        let err: AppError = Error::Internal("pool exhausted".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, "internal error");
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ErrorResponse {
            detail: "data not exist".to_string(),
        })
        .expect("serializable");
        assert_eq!(body, serde_json::json!({"detail": "data not exist"}));
    }
}
