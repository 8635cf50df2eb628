/**
 * API Error Type
 * One error enum for every handler; maps onto HTTP statuses and JSON bodies.
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation; carries one message per failing field.
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: BTreeMap<&'static str, String>,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database not available")]
    Unavailable,

    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// Shorthand for a validation failure over a set of field errors.
    pub fn validation(field_errors: BTreeMap<&'static str, String>) -> Self {
        ApiError::Validation {
            message: "Validation failed".to_string(),
            field_errors,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // 5xx bodies stay generic; the real error only goes to the logs.
        let body = match self {
            ApiError::Validation {
                message,
                field_errors,
            } => json!({
                "error": message,
                "fieldErrors": field_errors,
            }),
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                json!({ "error": "Internal server error" })
            }
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, body) = body_json(ApiError::NotFound("Project")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project not found");
    }

    #[tokio::test]
    async fn test_validation_carries_field_errors() {
        let mut fields = BTreeMap::new();
        fields.insert("name", "Name must be at least 2 characters".to_string());
        let (status, body) = body_json(ApiError::validation(fields)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["fieldErrors"]["name"],
            "Name must be at least 2 characters"
        );
    }

    #[tokio::test]
    async fn test_database_error_body_is_generic() {
        let (status, body) = body_json(ApiError::Database(sqlx::Error::PoolClosed)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn test_unavailable_maps_to_503() {
        let (status, body) = body_json(ApiError::Unavailable).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Database not available");
    }
}
