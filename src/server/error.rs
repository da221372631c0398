//! Error type shared by every handler.
//!
//! Whatever goes wrong, the caller receives a JSON `{error, detail}` body and
//! a non-2xx status.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::p6::{P6Error, QueryError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("P6 request failed ({status}): {detail}")]
    Upstream { status: StatusCode, detail: String },

    #[error("P6 did not respond in time")]
    UpstreamTimeout,

    #[error("P6 is unreachable: {0}")]
    UpstreamUnavailable(String),

    #[error("Server misconfiguration: {0}")]
    Configuration(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Internal(String),
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Upstream { status, .. } => *status,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::Configuration(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Upstream { .. } => "upstream_error",
            ApiError::UpstreamTimeout => "upstream_timeout",
            ApiError::UpstreamUnavailable(_) => "upstream_unavailable",
            ApiError::Configuration(_) => "configuration_error",
            ApiError::Validation(_) => "validation_error",
            ApiError::Unauthenticated(_) => "unauthenticated",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn detail(&self) -> String {
        match self {
            ApiError::Upstream { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Configuration(_) | ApiError::Internal(_) => error!("{}: {}", status, self),
            _ => warn!("{}: {}", status, self),
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            detail: self.detail(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<P6Error> for ApiError {
    fn from(err: P6Error) -> Self {
        match err {
            P6Error::Status { status, body } => {
                let status = StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                let detail = if body.is_empty() {
                    format!("P6 responded with status {}", status)
                } else {
                    body
                };
                ApiError::Upstream { status, detail }
            }
            P6Error::Timeout(_) => ApiError::UpstreamTimeout,
            P6Error::Transport(msg) => ApiError::UpstreamUnavailable(msg),
            P6Error::InvalidRequest(msg) => ApiError::Validation(msg),
            decode @ P6Error::Decode(_) => ApiError::Upstream {
                status: StatusCode::BAD_GATEWAY,
                detail: decode.to_string(),
            },
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
