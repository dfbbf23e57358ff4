use chrono::{DateTime, Utc};
use serde::Serialize;

use chefbook_core::UserId;

use crate::{Role, TokenClaims};

/// The authenticated identity for a single request.
///
/// Built from verified claims once the subject has been resolved against the
/// user directory. Roles come from the directory at that moment, not from the
/// token, so a role change takes effect on the next request. Never persisted;
/// dropped when the request completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub subject: UserId,
    pub roles: Vec<Role>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Principal {
    pub(crate) fn from_claims(claims: TokenClaims, roles: Vec<Role>) -> Self {
        Self {
            subject: claims.sub,
            roles,
            issued_at: claims.iat,
            expires_at: claims.exp,
        }
    }

    /// Whether the principal carries the administrative capability.
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(Role::is_admin)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.as_str() == role)
    }
}
