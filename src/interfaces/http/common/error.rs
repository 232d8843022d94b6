//! HTTP error taxonomy and the status policy that maps it onto codes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use super::envelope::{ApiEnvelope, NoPayload, Payload};
use crate::auth::AuthError;

/// Every way a user endpoint can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No database connection could be acquired.
    #[error("{0}")]
    Connection(String),

    /// Malformed path parameter or request body.
    #[error("{0}")]
    InvalidInput(String),

    /// Lookup found nothing. Carries a fixed, client-facing message.
    #[error("{0}")]
    NotFound(&'static str),

    /// A read query failed inside the store.
    #[error("{0}")]
    Query(String),

    #[error("permission denied")]
    PermissionDenied,

    /// A write was rejected by the store.
    #[error("{0}")]
    Operation(String),

    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// How errors map to HTTP status codes.
///
/// `Legacy` reproduces the historical API byte for byte: authorization and
/// input failures are 500 and read-query failures collapse into 404.
/// `Strict` uses 400/403 and keeps 404 for genuinely empty results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusPolicy {
    #[default]
    Legacy,
    Strict,
}

impl StatusPolicy {
    pub fn is_strict(&self) -> bool {
        matches!(self, StatusPolicy::Strict)
    }

    pub fn status_for(&self, err: &ApiError) -> StatusCode {
        match (self, err) {
            (_, ApiError::Auth(_)) => StatusCode::UNAUTHORIZED,
            (_, ApiError::NotFound(_)) => StatusCode::NOT_FOUND,
            (StatusPolicy::Strict, ApiError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            (StatusPolicy::Strict, ApiError::PermissionDenied) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render `err` as an envelope response.
    ///
    /// `NotFound` keeps the endpoint's payload fields (nulled); every other
    /// failure renders only `error` and `msg`.
    pub fn reject<P: Payload>(&self, err: ApiError) -> Response {
        let status = self.status_for(&err);

        match &err {
            ApiError::Connection(_) | ApiError::Query(_) | ApiError::Operation(_) => {
                error!(status = status.as_u16(), "{}", err)
            }
            _ => warn!(status = status.as_u16(), "{}", err),
        }

        match err {
            ApiError::NotFound(msg) => (status, Json(ApiEnvelope::<P>::failure(msg))).into_response(),
            other => (
                status,
                Json(ApiEnvelope::<NoPayload>::failure(other.to_string())),
            )
                .into_response(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        warn!("Rejected request: {}", self);
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiEnvelope::<NoPayload>::failure(self.to_string())),
        )
            .into_response()
    }
}
