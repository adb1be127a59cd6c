//! Gateway errors and their HTTP rendering.
//!
//! Every failure leaves the server as `{"detail": "..."}` with a status
//! derived from the error kind.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{error, warn};

use penpal_core::Error;

/// Detail sent for every transport failure; the underlying error is only logged.
pub const TRANSPORT_DETAIL: &str = "error calling model provider";

/// Error returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be bound or failed a field check.
    #[error("{0}")]
    Validation(String),

    /// The provider call or response interpretation failed.
    #[error(transparent)]
    Core(#[from] Error),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Core(Error::Provider { status, .. }) => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            ApiError::Core(Error::Transport(_))
            | ApiError::Core(Error::MalformedResponse)
            | ApiError::Core(Error::UnexpectedShape) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable `detail` string.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Validation(msg) => msg.clone(),
            ApiError::Core(Error::Provider { message, .. }) => message.clone(),
            ApiError::Core(Error::Transport(_)) => TRANSPORT_DETAIL.to_string(),
            ApiError::Core(other) => other.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();
        if status.is_server_error() {
            error!(status = %status, error = %self, "request failed");
        } else {
            warn!(status = %status, detail = %detail, "request rejected");
        }
        (status, axum::Json(json!({ "detail": detail }))).into_response()
    }
}
