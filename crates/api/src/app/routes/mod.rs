use axum::{
    Router,
    routing::{delete, get, post, put},
};

pub mod auth;
pub mod bookings;
pub mod payments;
pub mod profiles;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/profile/:id", put(profiles::update_profile))
        .route("/bookings/:id", delete(bookings::cancel_booking))
        .route("/payments/verify", post(payments::verify_payment))
}
