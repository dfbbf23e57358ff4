use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chefbook_auth::{
    OwnershipStore, ResourceRef, Role, StoreError, UserDirectory, UserRecord, normalize_email,
};
use chefbook_core::UserId;

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory store lock poisoned".to_string())
}

/// In-memory user directory for tests/dev.
///
/// Emails are stored normalised, so lookups are case-insensitive.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<HashMap<UserId, UserRecord>>,
    lookups: AtomicU64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, mut record: UserRecord) -> Result<(), StoreError> {
        record.email = normalize_email(&record.email);
        self.inner.write().map_err(|_| poisoned())?.insert(record.id, record);
        Ok(())
    }

    /// Replace a user's roles. Returns `false` if the user does not exist.
    pub fn set_roles(&self, id: UserId, roles: Vec<Role>) -> Result<bool, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(match map.get_mut(&id) {
            Some(user) => {
                user.roles = roles;
                true
            }
            None => false,
        })
    }

    pub fn remove(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.inner.write().map_err(|_| poisoned())?.remove(&id))
    }

    /// Number of queries served so far.
    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn current_roles(&self, id: UserId) -> Result<Option<Vec<Role>>, StoreError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).map(|u| u.roles.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|u| u.email == email).cloned())
    }
}

/// In-memory resource → owner mapping for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryOwnershipStore {
    inner: RwLock<HashMap<ResourceRef, UserId>>,
    lookups: AtomicU64,
}

impl InMemoryOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_owner(&self, resource: ResourceRef, owner: UserId) -> Result<(), StoreError> {
        self.inner.write().map_err(|_| poisoned())?.insert(resource, owner);
        Ok(())
    }

    pub fn remove(&self, resource: &ResourceRef) -> Result<Option<UserId>, StoreError> {
        Ok(self.inner.write().map_err(|_| poisoned())?.remove(resource))
    }

    pub fn lookups(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl OwnershipStore for InMemoryOwnershipStore {
    async fn owner_of(&self, resource: &ResourceRef) -> Result<Option<UserId>, StoreError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(resource).copied())
    }
}
