use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chefbook_auth::{GateError, InputError};

/// Handler-level error: a gate outcome rendered as `{success: false, message}`.
///
/// Only the generic message reaches the client; field names and store detail
/// stay in the logs.
#[derive(Debug)]
pub struct ApiError(pub GateError);

impl From<GateError> for ApiError {
    fn from(value: GateError) -> Self {
        Self(value)
    }
}

impl From<InputError> for ApiError {
    fn from(value: InputError) -> Self {
        Self(GateError::InvalidInput(value))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        gate_error_to_response(self.0)
    }
}

pub fn gate_error_to_response(err: GateError) -> Response {
    match err {
        GateError::InvalidToken => json_error(StatusCode::UNAUTHORIZED, "Not authorized"),
        GateError::InvalidCredentials => json_error(StatusCode::UNAUTHORIZED, "Invalid credentials"),
        GateError::Forbidden => json_error(StatusCode::FORBIDDEN, "Forbidden"),
        GateError::InvalidSignature => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "Payment verification failed")
        }
        GateError::InvalidInput(e) => {
            tracing::debug!(field = ?e.field(), reason = %e, "request rejected");
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid input")
        }
        GateError::ResourceNotFound => json_error(StatusCode::NOT_FOUND, "Resource not found"),
        GateError::Internal(detail) => {
            tracing::error!(%detail, "request failed with internal error");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "success": false,
            "message": message.into(),
        })),
    )
        .into_response()
}
