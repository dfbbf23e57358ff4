use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use chefbook_core::UserId;

use crate::Role;

/// Bearer token claims model (transport-agnostic).
///
/// `iat`/`exp` are serialized as Unix seconds, the standard JWT numeric date
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user record the token was issued for.
    pub sub: UserId,

    /// Roles granted at issuance time.
    #[serde(default)]
    pub roles: Vec<Role>,

    /// Issued-at timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// Signature verification happens before this, in [`crate::token`].
pub fn validate_claims(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(iat: DateTime<Utc>, ttl: Duration) -> TokenClaims {
        TokenClaims {
            sub: UserId::new(),
            roles: vec![Role::new(Role::CUSTOMER)],
            iat,
            exp: iat + ttl,
        }
    }

    #[test]
    fn accepts_inside_window() {
        let iat = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::hours(1));
        assert_eq!(validate_claims(&claims, iat), Ok(()));
        assert_eq!(validate_claims(&claims, iat + Duration::minutes(59)), Ok(()));
    }

    #[test]
    fn expiry_is_exclusive() {
        let iat = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, iat + Duration::hours(1)),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_issued_tokens_are_not_yet_valid() {
        let iat = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, iat - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let iat = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::zero());
        assert_eq!(
            validate_claims(&claims, iat),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn timestamps_serialize_as_unix_seconds() {
        let iat = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(iat, Duration::seconds(60));
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["iat"], serde_json::json!(iat.timestamp()));
        assert_eq!(json["exp"], serde_json::json!(iat.timestamp() + 60));
    }
}
