//! HTTP API application wiring (Axum router + store wiring).
//!
//! - `services.rs`: store adapters and gate construction
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and body parsing helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use chefbook_auth::AuthzGate;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router around a shared gate.
pub fn build_app(gate: Arc<AuthzGate>) -> Router {
    let auth_state = middleware::AuthState { gate: gate.clone() };

    // Protected routes: the middleware authenticates before any handler runs.
    let protected = routes::router()
        .layer(Extension(gate.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .layer(Extension(gate))
        .merge(protected)
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new())
}
