use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use chefbook_auth::{InputError, Principal, Role, ShapedBody, UserRecord};
use chefbook_core::{BookingId, UserId};

// -------------------------
// Request parsing
// -------------------------

/// Parse a raw body as a JSON object whose keys are free of operators.
///
/// Bodies are taken as bytes so malformed JSON gets the same error shape as
/// every other rejection.
pub fn parse_body(bytes: &[u8]) -> Result<ShapedBody, InputError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|_| InputError::NotAnObject)?;
    ShapedBody::parse(value)
}

/// Parse a route/body identifier into its typed id.
pub fn parse_id<T: FromStr>(field: &str, raw: &str) -> Result<T, InputError> {
    raw.parse().map_err(|_| InputError::InvalidId(field.to_string()))
}

pub const PROFILE_FIELDS: &[&str] = &["name", "bio", "phone", "location", "avatarUrl"];

/// Validated profile changes. Only whitelisted scalar fields are accepted, so
/// ownership or role fields cannot be smuggled into an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub changes: Vec<(String, Option<String>)>,
}

impl ProfilePatch {
    pub fn from_body(body: &ShapedBody) -> Result<Self, InputError> {
        if let Some(unknown) = body.keys().find(|k| !PROFILE_FIELDS.contains(k)) {
            return Err(InputError::UnknownField(unknown.to_string()));
        }

        let mut changes = Vec::new();
        for field in PROFILE_FIELDS {
            if body.keys().any(|k| k == *field) {
                changes.push((field.to_string(), body.optional_scalar(field)?));
            }
        }
        Ok(Self { changes })
    }

    pub fn fields(&self) -> Vec<&str> {
        self.changes.iter().map(|(f, _)| f.as_str()).collect()
    }
}

/// Payment confirmation body. Signature fields are read leniently so that a
/// missing one is judged as a failed verification rather than a shape error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerifyRequest {
    pub booking_id: BookingId,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

impl PaymentVerifyRequest {
    pub fn from_body(body: &ShapedBody) -> Result<Self, InputError> {
        let booking_id = body.scalar("bookingId")?;
        Ok(Self {
            booking_id: parse_id("bookingId", &booking_id)?,
            order_id: body.optional_scalar("orderId")?.unwrap_or_default(),
            payment_id: body.optional_scalar("paymentId")?.unwrap_or_default(),
            signature: body.optional_scalar("signature")?.unwrap_or_default(),
        })
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

impl From<&UserRecord> for UserView {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            roles: user.roles.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct MeResponse<'a> {
    pub success: bool,
    pub principal: &'a Principal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdatedResponse {
    pub success: bool,
    pub profile_id: String,
    pub updated: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCancelledResponse {
    pub success: bool,
    pub message: &'static str,
    pub booking_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerifiedResponse {
    pub success: bool,
    pub message: &'static str,
    pub booking_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chefbook_core::ProfileId;

    #[test]
    fn malformed_json_is_invalid_input() {
        assert_eq!(parse_body(b"{not json").unwrap_err(), InputError::NotAnObject);
        assert_eq!(parse_body(b"[1,2]").unwrap_err(), InputError::NotAnObject);
    }

    #[test]
    fn ids_parse_or_name_the_field() {
        let id: ProfileId = parse_id("id", "507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.to_string(), "507f1f77bcf86cd799439011");
        assert_eq!(
            parse_id::<ProfileId>("id", "not-an-id").unwrap_err(),
            InputError::InvalidId("id".into())
        );
    }

    #[test]
    fn profile_patch_accepts_known_scalars() {
        let body = parse_body(br#"{"name":"Chef Ana","phone":null}"#).unwrap();
        let patch = ProfilePatch::from_body(&body).unwrap();
        assert_eq!(
            patch.changes,
            vec![
                ("name".to_string(), Some("Chef Ana".to_string())),
                ("phone".to_string(), None),
            ]
        );
        assert_eq!(patch.fields(), vec!["name", "phone"]);
    }

    #[test]
    fn profile_patch_rejects_unknown_and_structured_fields() {
        let body = parse_body(br#"{"name":"x","userId":"507f1f77bcf86cd799439011"}"#).unwrap();
        assert_eq!(
            ProfilePatch::from_body(&body).unwrap_err(),
            InputError::UnknownField("userId".into())
        );

        let body = parse_body(br#"{"bio":{"long":"text"}}"#).unwrap();
        assert_eq!(
            ProfilePatch::from_body(&body).unwrap_err(),
            InputError::Structured("bio".into())
        );
    }

    #[test]
    fn payment_request_requires_a_booking_but_tolerates_missing_signature_fields() {
        let body = parse_body(br#"{"orderId":"o1","paymentId":"p1","signature":"ab"}"#).unwrap();
        assert_eq!(
            PaymentVerifyRequest::from_body(&body).unwrap_err(),
            InputError::Missing("bookingId".into())
        );

        let body = parse_body(br#"{"bookingId":"507f1f77bcf86cd799439011","orderId":"o1"}"#).unwrap();
        let req = PaymentVerifyRequest::from_body(&body).unwrap();
        assert_eq!(req.order_id, "o1");
        assert!(req.payment_id.is_empty());
        assert!(req.signature.is_empty());

        let body = parse_body(
            br#"{"bookingId":"507f1f77bcf86cd799439011","orderId":"o1","paymentId":"p1","signature":["ab"]}"#,
        )
        .unwrap();
        assert_eq!(
            PaymentVerifyRequest::from_body(&body).unwrap_err(),
            InputError::Structured("signature".into())
        );
    }
}
