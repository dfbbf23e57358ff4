use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    response::{IntoResponse, Response},
};

use chefbook_auth::{AuthzGate, ResourceRef};
use chefbook_core::BookingId;

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// `DELETE /bookings/:id`.
///
/// A booking owned by someone else answers exactly like one that does not
/// exist.
pub async fn cancel_booking(
    Extension(gate): Extension<Arc<AuthzGate>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let booking_id: BookingId = dto::parse_id("id", &id)?;
    gate.authorize_ownership(principal.principal(), &ResourceRef::Booking(booking_id))
        .await?;

    tracing::info!(subject = %principal.user_id(), booking_id = %booking_id, "booking cancellation authorized");

    Ok(Json(dto::BookingCancelledResponse {
        success: true,
        message: "Booking cancellation authorized",
        booking_id: booking_id.to_string(),
    })
    .into_response())
}
