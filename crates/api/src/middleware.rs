use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use chefbook_auth::{AuthzGate, GateError};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub gate: Arc<AuthzGate>,
}

/// Authenticate the bearer token and attach the principal to the request.
///
/// Runs before any protected handler; a request without a valid token never
/// reaches one.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let principal = state.gate.authenticate(token, Utc::now()).await?;

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, GateError> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(GateError::InvalidToken)?;

    let header = header.to_str().map_err(|_| GateError::InvalidToken)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(GateError::InvalidToken)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(GateError::InvalidToken);
    }

    Ok(token)
}
