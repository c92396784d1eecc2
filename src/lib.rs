//! UserEvents REST API
//!
//! A small REST API for managing users and the events they own, backed by
//! PostgreSQL. A generic CRUD service layer is instantiated once per entity
//! and thin axum handlers adapt HTTP requests to service calls.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod hubs;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, UserEventsError};

// Re-export main components for easy access
pub use handlers::router;
pub use services::ServiceFactory;
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
