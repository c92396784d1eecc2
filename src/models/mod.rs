//! Data models module
//!
//! This module contains the persisted entities, their public DTOs and the
//! request bodies used throughout the application

pub mod email;
pub mod event;
pub mod user;
pub mod validation;

// Re-export commonly used models
pub use email::{ContactMessage, EmailDto};
pub use event::{
    CreateEventDto, CreateUserEventDto, Event, EventDetails, EventDto, EventFilter, NewEvent,
};
pub use user::{CreateUserDto, NewUser, User, UserDto, UserFilter};
pub use validation::ValidationErrors;
