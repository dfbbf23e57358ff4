//! User-directory and resource-ownership adapters.
//!
//! - `in_memory`: dev/test adapters with lookup counters
//! - `postgres`: durable adapters over a `sqlx` pool

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryOwnershipStore, InMemoryUserDirectory};
pub use postgres::{PostgresOwnershipStore, PostgresUserDirectory};
