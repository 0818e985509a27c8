//! HTTP error mapping.
//!
//! The engine's error kinds carry no HTTP semantics of their own; this is
//! where they pick up status codes and a stable machine-readable error code.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::source::FetchError;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// API error response structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Upstream fetch failures are a gateway problem, not ours.
            ServerError::Fetch(_) => StatusCode::BAD_GATEWAY,
            ServerError::Engine(EngineError::Decode(_) | EngineError::Convert(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ServerError::Engine(_) | ServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::Fetch(_) => "FETCH_ERROR",
            ServerError::Engine(EngineError::Decode(_)) => "DECODE_ERROR",
            ServerError::Engine(EngineError::Convert(_)) => "CONVERSION_ERROR",
            ServerError::Engine(EngineError::Compare(_)) => "CONFIGURATION_ERROR",
            ServerError::Engine(EngineError::Store(_)) => "PERSIST_ERROR",
            ServerError::Engine(EngineError::StartupLoad { .. }) => "STARTUP_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
            },
        });

        (status, body).into_response()
    }
}
