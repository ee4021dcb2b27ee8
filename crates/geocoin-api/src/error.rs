//! Error types for the HTTP API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The body
//! is always `{error, status}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use geocoin_core::CoreError;
use geocoin_types::ParseIdError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was malformed.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request conflicts with the current coin ownership.
    #[error("{0}")]
    Conflict(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoCache(_) => Self::NotFound(err.to_string()),
            CoreError::InvalidPoint { .. } => Self::BadRequest(err.to_string()),
            CoreError::Ledger { .. } => Self::Conflict(err.to_string()),
            CoreError::World { .. } | CoreError::Storage { .. } => {
                Self::Internal(err.to_string())
            }
        }
    }
}

impl From<ParseIdError> for ApiError {
    fn from(err: ParseIdError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use geocoin_ledger::LedgerError;
    use geocoin_types::{Cell, Coin};

    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let cases = [
            (CoreError::NoCache(Cell::new(1, 1)), StatusCode::NOT_FOUND),
            (
                CoreError::InvalidPoint {
                    lat: f64::NAN,
                    lng: 0.0,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::Ledger {
                    source: LedgerError::CoinNotCarried(Coin::new(0, 0, 0)),
                },
                StatusCode::CONFLICT,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
