//! Error handling for UserEvents
//!
//! This module defines the main error type used throughout the application
//! and how each kind of failure maps onto an HTTP status.

use axum::http::StatusCode;
use thiserror::Error;

use crate::models::validation::ValidationErrors;

/// Main error type for UserEvents application
#[derive(Error, Debug)]
pub enum UserEventsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid identifier.")]
    InvalidIdentifier,

    #[error("Invalid parent id: {parent_id}")]
    InvalidParent { parent_id: i32 },

    #[error("A parent id is required.")]
    MissingParent,

    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("The operation was canceled.")]
    Cancelled,

    #[error("Email error: {0}")]
    Email(String),
}

/// Result type alias for UserEvents operations
pub type Result<T> = std::result::Result<T, UserEventsError>;

impl From<ValidationErrors> for UserEventsError {
    fn from(errors: ValidationErrors) -> Self {
        UserEventsError::Validation(errors)
    }
}

impl From<config::ConfigError> for UserEventsError {
    fn from(error: config::ConfigError) -> Self {
        UserEventsError::Config(error.to_string())
    }
}

impl UserEventsError {
    /// HTTP status the error is reported with.
    ///
    /// Only a missing entity gets its own status; every other failure,
    /// including ones that originate on the server, is reported as a bad
    /// request carrying the error message.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserEventsError::InvalidIdentifier => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Whether the failure was caused by the request itself rather than by
    /// the database, the mail relay or the configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            UserEventsError::InvalidIdentifier
                | UserEventsError::InvalidParent { .. }
                | UserEventsError::MissingParent
                | UserEventsError::Validation(_)
                | UserEventsError::InvalidInput(_)
                | UserEventsError::Cancelled
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_identifier_is_not_found() {
        let err = UserEventsError::InvalidIdentifier;
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Invalid identifier.");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_everything_else_is_bad_request() {
        let errors = [
            UserEventsError::InvalidParent { parent_id: 7 },
            UserEventsError::MissingParent,
            UserEventsError::Cancelled,
            UserEventsError::Config("missing".to_string()),
            UserEventsError::Email("relay refused".to_string()),
            UserEventsError::Database(sqlx::Error::RowNotFound),
        ];

        for err in errors {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{err}");
        }
    }

    #[test]
    fn test_server_side_failures_are_not_client_errors() {
        assert!(!UserEventsError::Database(sqlx::Error::PoolTimedOut).is_client_error());
        assert!(!UserEventsError::Email("timeout".to_string()).is_client_error());
        assert!(UserEventsError::InvalidParent { parent_id: 1 }.is_client_error());
    }

    #[test]
    fn test_invalid_parent_message_names_the_id() {
        let err = UserEventsError::InvalidParent { parent_id: 42 };
        assert_eq!(err.to_string(), "Invalid parent id: 42");
    }
}
