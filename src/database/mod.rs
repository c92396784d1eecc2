//! Database module
//!
//! This module handles database connections, the entity/projection contracts
//! and the SQL the generic services are built from.

pub mod connection;
pub mod entity;
pub mod query;

// Re-export commonly used database components
pub use connection::{DatabasePool, DatabaseConfig, create_pool, run_migrations};
pub use entity::{Entity, Predicate, Projection};
