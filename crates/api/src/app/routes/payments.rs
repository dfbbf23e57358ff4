use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    response::{IntoResponse, Response},
};

use chefbook_auth::{AuthzGate, ResourceRef};

use crate::app::dto::{self, PaymentVerifyRequest};
use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// `POST /payments/verify`.
///
/// Order of checks: body shape, booking ownership, then the HMAC over
/// `orderId|paymentId`. Only a request passing all three confirms payment.
pub async fn verify_payment(
    Extension(gate): Extension<Arc<AuthzGate>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let body = dto::parse_body(&body)?;
    let req = PaymentVerifyRequest::from_body(&body)?;

    gate.authorize_ownership(principal.principal(), &ResourceRef::Booking(req.booking_id))
        .await?;
    gate.verify_payment_signature(&req.order_id, &req.payment_id, &req.signature)?;

    tracing::info!(
        subject = %principal.user_id(),
        booking_id = %req.booking_id,
        order_id = %req.order_id,
        "payment verified"
    );

    Ok(Json(dto::PaymentVerifiedResponse {
        success: true,
        message: "Payment signature verified",
        booking_id: req.booking_id.to_string(),
    })
    .into_response())
}
