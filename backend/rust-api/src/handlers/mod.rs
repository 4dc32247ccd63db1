use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose, Engine as _};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::errors::ServiceError;
use crate::services::AppState;

pub mod admin;
pub mod round1;
pub mod round2;
pub mod round3;
pub mod teams;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let storage = match tokio::time::timeout(
        std::time::Duration::from_secs(1),
        state.teams.ping(),
    )
    .await
    {
        Ok(Ok(())) => json!({ "status": "healthy" }),
        Ok(Err(e)) => json!({ "status": "unhealthy", "error": format!("Storage error: {}", e) }),
        Err(_) => json!({ "status": "unhealthy", "error": "Storage timeout after 1s" }),
    };

    let (status, status_code) = if storage["status"] == "healthy" {
        ("healthy", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "neurovia-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "storage": storage }
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render_metrics() {
        Ok(metrics_text) => (StatusCode::OK, metrics_text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to render metrics: {}", e),
        ),
    }
}

/// Metrics authentication middleware - protects /metrics endpoint with HTTP Basic Auth
pub async fn metrics_auth_middleware(
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let encoded = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let decoded = general_purpose::STANDARD
        .decode(encoded)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let credentials = String::from_utf8(decoded).map_err(|_| StatusCode::UNAUTHORIZED)?;

    // Format: username:password
    let expected = std::env::var("METRICS_AUTH").unwrap_or_else(|_| "admin:changeme".to_string());

    if credentials != expected {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(request).await)
}

/// Error body shared by every endpoint: `{"kind", "message", "status"}`
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Validation(String),
    InsufficientBalance { required: i64, available: i64 },
    Conflict(String),
    Precondition(String),
    Unauthorized(String),
    Forbidden(String),
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InsufficientBalance { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Precondition(_) => StatusCode::PRECONDITION_FAILED,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::Validation(_) => "validation",
            ApiError::InsufficientBalance { .. } => "validation",
            ApiError::Conflict(_) => "conflict",
            ApiError::Precondition(_) => "precondition",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Internal => "internal",
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(message) => ApiError::NotFound(message),
            ServiceError::Validation(message) => ApiError::Validation(message),
            ServiceError::InsufficientBalance {
                required,
                available,
            } => ApiError::InsufficientBalance {
                required,
                available,
            },
            ServiceError::Conflict(message) => ApiError::Conflict(message),
            ServiceError::Precondition(message) => ApiError::Precondition(message),
            ServiceError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let body = match self {
            ApiError::InsufficientBalance {
                required,
                available,
            } => json!({
                "kind": kind,
                "message": "Insufficient balance",
                "status": status.as_u16(),
                "required": required,
                "available": available,
            }),
            ApiError::Internal => json!({
                "kind": kind,
                "message": "Internal server error",
                "status": status.as_u16(),
            }),
            ApiError::NotFound(message)
            | ApiError::Validation(message)
            | ApiError::Conflict(message)
            | ApiError::Precondition(message)
            | ApiError::Unauthorized(message)
            | ApiError::Forbidden(message) => json!({
                "kind": kind,
                "message": message,
                "status": status.as_u16(),
            }),
        };
        (status, Json(body)).into_response()
    }
}
