//! User model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::database::{Entity, Predicate, Projection};
use crate::models::event::EventDto;
use crate::models::validation::{require_text, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub notes: Option<String>,
}

impl Entity for User {
    type Filter = UserFilter;

    const TABLE: &'static str = "users";
    const COLUMNS: &'static [&'static str] = &["id", "first_name", "last_name", "notes"];

    fn id(&self) -> i32 {
        self.id
    }
}

/// Filters accepted by the user services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Id(i32),
    FullName { first_name: String, last_name: String },
}

impl Predicate<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Id(id) => user.id == *id,
            UserFilter::FullName { first_name, last_name } => {
                user.first_name == *first_name && user.last_name == *last_name
            }
        }
    }

    fn push_sql(&self, query: &mut QueryBuilder<'_, Postgres>) {
        match self {
            UserFilter::Id(id) => {
                query.push("id = ").push_bind(*id);
            }
            UserFilter::FullName { first_name, last_name } => {
                query
                    .push("first_name = ")
                    .push_bind(first_name.clone())
                    .push(" AND last_name = ")
                    .push_bind(last_name.clone());
            }
        }
    }
}

/// Public representation of a user.
///
/// `events` is only filled in when the caller asks for the nested shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventDto>>,
}

impl Projection<User> for UserDto {
    const COLUMNS: &'static [&'static str] = &["id", "first_name", "last_name", "notes"];

    fn project(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            notes: user.notes.clone(),
            events: None,
        }
    }
}

impl UserDto {
    pub fn with_events(mut self, events: Vec<EventDto>) -> Self {
        self.events = Some(events);
        self
    }
}

/// Body of create, replace and update requests.
///
/// Every field is optional on the wire; create and replace require the
/// names, update keeps the stored value of any field left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub notes: Option<String>,
}

/// A fully validated set of user fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub notes: Option<String>,
}

impl CreateUserDto {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// Validation for create and replace: both names are required.
    pub fn validate(&self) -> Result<NewUser, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let first_name = require_text(&mut errors, "firstName", self.first_name.as_deref());
        let last_name = require_text(&mut errors, "lastName", self.last_name.as_deref());

        match (first_name, last_name) {
            (Some(first_name), Some(last_name)) => Ok(NewUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                notes: self.notes.clone(),
            }),
            _ => Err(errors),
        }
    }

    /// Validation for partial updates: fields that are present must be usable.
    pub fn validate_partial(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.first_name.is_some() {
            require_text(&mut errors, "firstName", self.first_name.as_deref());
        }
        if self.last_name.is_some() {
            require_text(&mut errors, "lastName", self.last_name.as_deref());
        }
        errors.into_result()
    }

    /// Overwrites the fields that are present, keeping the rest.
    pub fn merge_into(self, user: &mut User) {
        if let Some(first_name) = self.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = self.last_name {
            user.last_name = last_name;
        }
        if let Some(notes) = self.notes {
            user.notes = Some(notes);
        }
    }
}

impl NewUser {
    /// Overwrites every mutable field.
    pub fn overwrite(self, user: &mut User) {
        user.first_name = self.first_name;
        user.last_name = self.last_name;
        user.notes = self.notes;
    }
}
