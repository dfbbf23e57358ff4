//! Postgres-backed identity adapters.
//!
//! Expected schema (ids are 24-char lowercase hex object ids):
//!
//! ```sql
//! CREATE TABLE users (
//!     id            CHAR(24) PRIMARY KEY,
//!     email         TEXT NOT NULL,
//!     roles         TEXT[] NOT NULL DEFAULT '{}',
//!     password_hash TEXT NOT NULL -- argon2 PHC string
//! );
//! CREATE UNIQUE INDEX users_email_lower ON users (lower(email));
//! CREATE TABLE profiles (id CHAR(24) PRIMARY KEY, user_id CHAR(24) NOT NULL REFERENCES users(id));
//! CREATE TABLE bookings (id CHAR(24) PRIMARY KEY, customer_id CHAR(24) NOT NULL REFERENCES users(id));
//! ```
//!
//! All queries bind parameters; identifiers reach SQL only as already-parsed
//! typed ids. Email lookups compare `lower(email)`, so stored casing does not
//! matter and the unique index above forbids case-variant duplicates.

use std::sync::Arc;

use sqlx::{PgPool, Row};
use tracing::instrument;

use chefbook_auth::{
    Credential, OwnershipStore, ResourceRef, Role, StoreError, UserDirectory, UserRecord,
    normalize_email,
};
use chefbook_core::UserId;

const FIND_BY_EMAIL_SQL: &str = r#"
    SELECT id, email, roles, password_hash
    FROM users
    WHERE lower(email) = $1
"#;

#[derive(Debug, Clone)]
pub struct PostgresUserDirectory {
    pool: Arc<PgPool>,
}

impl PostgresUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl UserDirectory for PostgresUserDirectory {
    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn current_roles(&self, id: UserId) -> Result<Option<Vec<Role>>, StoreError> {
        let row = sqlx::query("SELECT roles FROM users WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("users.current_roles", e))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let roles: Vec<String> = row.try_get("roles").map_err(corrupt)?;
        Ok(Some(roles.into_iter().map(Role::new).collect()))
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(FIND_BY_EMAIL_SQL)
            .bind(normalize_email(email))
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("users.find_by_email", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let id: String = row.try_get("id").map_err(corrupt)?;
        let email: String = row.try_get("email").map_err(corrupt)?;
        let roles: Vec<String> = row.try_get("roles").map_err(corrupt)?;
        let password_hash: String = row.try_get("password_hash").map_err(corrupt)?;

        Ok(Some(UserRecord {
            id: id
                .trim()
                .parse()
                .map_err(|e| StoreError::Corrupt(format!("users.id: {e}")))?,
            email,
            roles: roles.into_iter().map(Role::new).collect(),
            credential: Credential::from_phc(password_hash.trim())
                .map_err(|e| StoreError::Corrupt(e.to_string()))?,
        }))
    }
}

#[derive(Debug, Clone)]
pub struct PostgresOwnershipStore {
    pool: Arc<PgPool>,
}

impl PostgresOwnershipStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn owner_query(resource: &ResourceRef) -> &'static str {
    match resource {
        ResourceRef::Profile(_) => "SELECT user_id AS owner FROM profiles WHERE id = $1",
        ResourceRef::Booking(_) => "SELECT customer_id AS owner FROM bookings WHERE id = $1",
    }
}

#[async_trait::async_trait]
impl OwnershipStore for PostgresOwnershipStore {
    #[instrument(skip(self), fields(resource = %resource), err)]
    async fn owner_of(&self, resource: &ResourceRef) -> Result<Option<UserId>, StoreError> {
        let row = sqlx::query(owner_query(resource))
            .bind(resource.record_id().to_string())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("owner_of", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let owner: String = row.try_get("owner").map_err(corrupt)?;
        let owner = owner
            .trim()
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("{} owner: {e}", resource.kind().as_str())))?;
        Ok(Some(owner))
    }
}

fn corrupt(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Unavailable(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("decode error in {}: {}", operation, err))
        }
        _ => StoreError::Unavailable(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chefbook_core::{BookingId, ProfileId};

    #[test]
    fn owner_queries_target_the_resource_table() {
        assert!(owner_query(&ResourceRef::Profile(ProfileId::new())).contains("FROM profiles"));
        assert!(owner_query(&ResourceRef::Booking(BookingId::new())).contains("FROM bookings"));
    }

    #[test]
    fn email_lookup_ignores_stored_casing() {
        assert!(FIND_BY_EMAIL_SQL.contains("WHERE lower(email) = $1"));
    }

    #[test]
    fn pool_errors_are_unavailable_not_corrupt() {
        assert!(matches!(
            map_sqlx_error("owner_of", sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error("owner_of", sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }
}
