use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde_json::Value;

use chefbook_auth::{AuthzGate, FieldValue, InputError};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// `POST /auth/login`.
///
/// Fields are handed to the gate exactly as they arrived; the gate's
/// injection guard decides whether they may reach the user directory.
pub async fn login(
    Extension(gate): Extension<Arc<AuthzGate>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body: Value = serde_json::from_slice(&body).map_err(|_| InputError::NotAnObject)?;
    let Value::Object(fields) = body else {
        return Err(InputError::NotAnObject.into());
    };

    let issued = gate
        .login(
            FieldValue::from_json(fields.get("email")),
            FieldValue::from_json(fields.get("password")),
            Utc::now(),
        )
        .await?;

    Ok(Json(dto::LoginResponse {
        success: true,
        token: issued.token,
        user: dto::UserView::from(&issued.user),
    })
    .into_response())
}

/// `GET /auth/me`.
pub async fn me(Extension(principal): Extension<PrincipalContext>) -> Response {
    Json(dto::MeResponse {
        success: true,
        principal: principal.principal(),
    })
    .into_response()
}
