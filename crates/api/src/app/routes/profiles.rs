use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Extension, Path},
    response::{IntoResponse, Response},
};

use chefbook_auth::{AuthzGate, ResourceRef};
use chefbook_core::ProfileId;

use crate::app::dto::{self, ProfilePatch};
use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

/// `PUT /profile/:id`.
///
/// Ownership is checked before the body is read.
pub async fn update_profile(
    Extension(gate): Extension<Arc<AuthzGate>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let profile_id: ProfileId = dto::parse_id("id", &id)?;
    gate.authorize_ownership(principal.principal(), &ResourceRef::Profile(profile_id))
        .await?;

    let body = dto::parse_body(&body)?;
    let patch = ProfilePatch::from_body(&body)?;

    tracing::info!(
        subject = %principal.user_id(),
        profile_id = %profile_id,
        fields = ?patch.fields(),
        "profile update authorized"
    );

    Ok(Json(dto::ProfileUpdatedResponse {
        success: true,
        profile_id: profile_id.to_string(),
        updated: patch.fields().into_iter().map(str::to_string).collect(),
    })
    .into_response())
}
