use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use chefbook_auth::{AuthzGate, GateConfig, GateConfigError, OwnershipStore, UserDirectory};
use chefbook_infra::{
    InMemoryOwnershipStore, InMemoryUserDirectory, PostgresOwnershipStore, PostgresUserDirectory,
};

use crate::config::ApiConfig;

const PG_MAX_CONNECTIONS: u32 = 10;

/// The two read ports the gate is built over.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserDirectory>,
    pub ownership: Arc<dyn OwnershipStore>,
}

impl Stores {
    pub fn in_memory(users: Arc<InMemoryUserDirectory>, ownership: Arc<InMemoryOwnershipStore>) -> Self {
        Self { users, ownership }
    }

    pub async fn postgres(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_MAX_CONNECTIONS)
            .connect(database_url)
            .await?;

        Ok(Self {
            users: Arc::new(PostgresUserDirectory::new(pool.clone())),
            ownership: Arc::new(PostgresOwnershipStore::new(pool)),
        })
    }

    /// Postgres when `DATABASE_URL` is configured, empty in-memory stores otherwise.
    pub async fn from_config(config: &ApiConfig) -> Result<Self, sqlx::Error> {
        match config.database_url.as_deref() {
            Some(url) => {
                tracing::info!("using postgres identity stores");
                Self::postgres(url).await
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using empty in-memory identity stores");
                Ok(Self::in_memory(
                    Arc::new(InMemoryUserDirectory::new()),
                    Arc::new(InMemoryOwnershipStore::new()),
                ))
            }
        }
    }
}

pub fn build_gate(config: &GateConfig, stores: Stores) -> Result<Arc<AuthzGate>, GateConfigError> {
    Ok(Arc::new(AuthzGate::new(config, stores.users, stores.ownership)?))
}
