//! Infrastructure layer: store adapters behind the gate's read ports.

pub mod identity;

pub use identity::{
    InMemoryOwnershipStore, InMemoryUserDirectory, PostgresOwnershipStore, PostgresUserDirectory,
};
