//! `AuthzGate`: the request-pipeline filter in front of every state-mutating
//! handler.
//!
//! The gate holds only read-only state (signing secrets and store handles), so
//! a single instance is shared across all requests behind an `Arc`.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::authorize::{self, AuthzError, ResourceRef};
use crate::input::{self, FieldValue, InputError};
use crate::payment::{PaymentAssertion, PaymentError, PaymentVerifier};
use crate::ports::{OwnershipStore, StoreError, UserDirectory, UserRecord, normalize_email};
use crate::token::{Hs256JwtCodec, JwtIssuer, JwtValidator, TokenError};
use crate::{Credential, CredentialError, Principal};

/// Terminal outcome of a failed gate check.
///
/// Callers see only the class of failure; the details carried here are for
/// logs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("invalid token")]
    InvalidToken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("forbidden")]
    Forbidden,

    #[error("invalid payment signature")]
    InvalidSignature,

    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("resource not found")]
    ResourceNotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthzError> for GateError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden => GateError::Forbidden,
            AuthzError::ResourceNotFound => GateError::ResourceNotFound,
        }
    }
}

impl From<StoreError> for GateError {
    fn from(value: StoreError) -> Self {
        GateError::Internal(value.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateConfigError {
    #[error("token signing secret must not be empty")]
    EmptyTokenSecret,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Secrets and limits the gate is constructed with.
#[derive(Clone)]
pub struct GateConfig {
    pub token_secret: String,
    pub payment_secret: String,
    pub token_ttl: Duration,
}

impl core::fmt::Debug for GateConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GateConfig")
            .field("token_secret", &"<redacted>")
            .field("payment_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub user: UserRecord,
}

pub struct AuthzGate {
    codec: Hs256JwtCodec,
    payments: PaymentVerifier,
    users: Arc<dyn UserDirectory>,
    ownership: Arc<dyn OwnershipStore>,
    // Compared against when the email is unknown, so both login failure paths
    // do the same work.
    decoy: Credential,
}

impl core::fmt::Debug for AuthzGate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthzGate")
            .field("codec", &self.codec)
            .finish_non_exhaustive()
    }
}

impl AuthzGate {
    pub fn new(
        config: &GateConfig,
        users: Arc<dyn UserDirectory>,
        ownership: Arc<dyn OwnershipStore>,
    ) -> Result<Self, GateConfigError> {
        if config.token_secret.is_empty() {
            return Err(GateConfigError::EmptyTokenSecret);
        }
        let codec = Hs256JwtCodec::new(config.token_secret.as_bytes()).with_ttl(config.token_ttl)?;
        let payments = PaymentVerifier::new(config.payment_secret.as_bytes())?;

        Ok(Self {
            codec,
            payments,
            users,
            ownership,
            decoy: Credential::new("decoy")?,
        })
    }

    /// Verify a bearer token and resolve its subject to an existing user.
    ///
    /// The principal carries the roles the directory holds now; roles in the
    /// token are ignored. Every token problem collapses to `InvalidToken`;
    /// only a store fault is reported differently.
    pub async fn authenticate(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, GateError> {
        let claims = match self.codec.validate(token, now) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(reason = %e, "bearer token rejected");
                return Err(GateError::InvalidToken);
            }
        };

        match self.users.current_roles(claims.sub).await {
            Ok(Some(roles)) => Ok(Principal::from_claims(claims, roles)),
            Ok(None) => {
                tracing::debug!(subject = %claims.sub, "token subject no longer exists");
                Err(GateError::InvalidToken)
            }
            Err(e) => {
                tracing::error!(error = %e, "user lookup failed during authentication");
                Err(e.into())
            }
        }
    }

    /// Require that `principal` owns `resource` (or carries the admin role).
    pub async fn authorize_ownership(
        &self,
        principal: &Principal,
        resource: &ResourceRef,
    ) -> Result<(), GateError> {
        let owner = self.ownership.owner_of(resource).await.map_err(|e| {
            tracing::error!(error = %e, resource = %resource, "ownership lookup failed");
            GateError::from(e)
        })?;

        authorize::authorize_ownership(principal, resource, owner).map_err(|e| {
            tracing::warn!(
                subject = %principal.subject,
                resource = %resource,
                outcome = %e,
                "ownership check denied"
            );
            GateError::from(e)
        })
    }

    pub fn verify_payment_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), GateError> {
        self.payments
            .verify_fields(order_id, payment_id, signature)
            .map_err(|e| {
                tracing::warn!(order_id, payment_id, reason = %e, "payment signature rejected");
                GateError::InvalidSignature
            })
    }

    pub fn verify_payment(&self, assertion: &PaymentAssertion) -> Result<(), GateError> {
        self.verify_payment_signature(&assertion.order_id, &assertion.payment_id, &assertion.signature)
    }

    /// Accept `value` only as a plain, non-empty string.
    pub fn reject_injection_operators(&self, field: &str, value: FieldValue) -> Result<String, GateError> {
        input::reject_injection_operators(field, value).map_err(|e| {
            tracing::warn!(field, reason = %e, "rejected non-scalar identity field");
            GateError::from(e)
        })
    }

    /// Exchange email/password for a bearer token.
    ///
    /// Both fields pass the injection guard before the directory is queried.
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn login(
        &self,
        email: FieldValue,
        password: FieldValue,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, GateError> {
        let email = self.reject_injection_operators("email", email)?;
        let password = self.reject_injection_operators("password", password)?;

        let user = self
            .users
            .find_by_email(&normalize_email(&email))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "user lookup failed during login");
                GateError::from(e)
            })?;

        let Some(user) = user else {
            let _ = self.decoy.verify(&password);
            tracing::debug!("login failed");
            return Err(GateError::InvalidCredentials);
        };
        if !user.credential.verify(&password) {
            tracing::debug!(subject = %user.id, "login failed");
            return Err(GateError::InvalidCredentials);
        }

        let token = self.issue_token(&user, now)?;
        tracing::info!(subject = %user.id, "login succeeded");
        Ok(IssuedToken { token, user })
    }

    pub fn issue_token(&self, user: &UserRecord, now: DateTime<Utc>) -> Result<String, GateError> {
        self.codec
            .issue(user.id, user.roles.clone(), now)
            .map_err(|e| GateError::Internal(e.to_string()))
    }
}
