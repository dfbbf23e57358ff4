//! Read-side ports the gate consumes.
//!
//! Both are lookups against the durable store, queried at check time and never
//! cached across requests.

use std::sync::Arc;

use thiserror::Error;

use chefbook_core::UserId;

use crate::{Credential, ResourceRef, Role};

/// Infrastructure failure while reading from a store.
///
/// Never an authorization outcome: callers surface it as a server fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// A user account as the gate needs to see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
    pub credential: Credential,
}

#[async_trait::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Roles the user currently holds, or `None` if no such user exists.
    async fn current_roles(&self, id: UserId) -> Result<Option<Vec<Role>>, StoreError>;

    /// Look up by normalised (trimmed, lower-cased) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
}

#[async_trait::async_trait]
pub trait OwnershipStore: Send + Sync {
    /// Current owner of `resource`, or `None` if it does not exist.
    async fn owner_of(&self, resource: &ResourceRef) -> Result<Option<UserId>, StoreError>;
}

#[async_trait::async_trait]
impl<S> UserDirectory for Arc<S>
where
    S: UserDirectory + ?Sized,
{
    async fn current_roles(&self, id: UserId) -> Result<Option<Vec<Role>>, StoreError> {
        (**self).current_roles(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        (**self).find_by_email(email).await
    }
}

#[async_trait::async_trait]
impl<S> OwnershipStore for Arc<S>
where
    S: OwnershipStore + ?Sized,
{
    async fn owner_of(&self, resource: &ResourceRef) -> Result<Option<UserId>, StoreError> {
        (**self).owner_of(resource).await
    }
}

/// Canonical form used for email lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
