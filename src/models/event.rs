//! Event model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, Postgres, QueryBuilder};

use crate::database::{Entity, Predicate, Projection};
use crate::models::validation::{
    check_max_length, check_range, require, require_text, ValidationErrors, MAX_SHORT_TEXT,
};

pub const MIN_DURATION: i32 = 10;
pub const MAX_DURATION: i32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i32,
    pub title: String,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    /// Minutes
    pub duration: i32,
    pub user_id: i32,
}

impl Entity for Event {
    type Filter = EventFilter;

    const TABLE: &'static str = "events";
    const COLUMNS: &'static [&'static str] =
        &["id", "title", "location", "start", "duration", "user_id"];

    fn id(&self) -> i32 {
        self.id
    }
}

/// Filters accepted by the event services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    Id(i32),
    /// Every event owned by a user
    User(i32),
    /// One event, only if owned by the given user
    UserEvent { user_id: i32, id: i32 },
    Users(Vec<i32>),
}

impl Predicate<Event> for EventFilter {
    fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::Id(id) => event.id == *id,
            EventFilter::User(user_id) => event.user_id == *user_id,
            EventFilter::UserEvent { user_id, id } => event.user_id == *user_id && event.id == *id,
            EventFilter::Users(user_ids) => user_ids.contains(&event.user_id),
        }
    }

    fn push_sql(&self, query: &mut QueryBuilder<'_, Postgres>) {
        match self {
            EventFilter::Id(id) => {
                query.push("id = ").push_bind(*id);
            }
            EventFilter::User(user_id) => {
                query.push("user_id = ").push_bind(*user_id);
            }
            EventFilter::UserEvent { user_id, id } => {
                query
                    .push("user_id = ")
                    .push_bind(*user_id)
                    .push(" AND id = ")
                    .push_bind(*id);
            }
            EventFilter::Users(user_ids) => {
                query.push("user_id = ANY(").push_bind(user_ids.clone()).push(")");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EventDto {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub duration: i32,
}

impl Projection<Event> for EventDto {
    const COLUMNS: &'static [&'static str] =
        &["id", "user_id", "title", "location", "start", "duration"];

    fn project(event: &Event) -> Self {
        Self {
            id: event.id,
            user_id: event.user_id,
            title: event.title.clone(),
            location: event.location.clone(),
            start: event.start,
            duration: event.duration,
        }
    }
}

/// Validated event fields, without the owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDetails {
    pub title: String,
    pub location: Option<String>,
    pub start: DateTime<Utc>,
    pub duration: i32,
}

impl EventDetails {
    pub fn with_owner(self, user_id: i32) -> NewEvent {
        NewEvent {
            user_id,
            details: self,
        }
    }

    /// Overwrites every mutable field except the owner.
    pub fn overwrite(self, event: &mut Event) {
        event.title = self.title;
        event.location = self.location;
        event.start = self.start;
        event.duration = self.duration;
    }
}

/// A validated event ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub user_id: i32,
    pub details: EventDetails,
}

impl NewEvent {
    pub fn overwrite(self, event: &mut Event) {
        event.user_id = self.user_id;
        self.details.overwrite(event);
    }
}

fn validate_details(
    errors: &mut ValidationErrors,
    title: Option<&str>,
    location: Option<&str>,
    start: Option<DateTime<Utc>>,
    duration: Option<i32>,
) -> Option<EventDetails> {
    let title = require_text(errors, "title", title);
    check_max_length(errors, "title", title, MAX_SHORT_TEXT);
    check_max_length(errors, "location", location, MAX_SHORT_TEXT);
    let start = require(errors, "start", start);
    let duration = require(errors, "duration", duration);
    check_range(errors, "duration", duration, MIN_DURATION, MAX_DURATION);

    match (title, start, duration) {
        (Some(title), Some(start), Some(duration)) if errors.is_empty() => Some(EventDetails {
            title: title.to_string(),
            location: location.map(str::to_string),
            start,
            duration,
        }),
        _ => None,
    }
}

fn validate_present(
    errors: &mut ValidationErrors,
    title: Option<&str>,
    location: Option<&str>,
    duration: Option<i32>,
) {
    if title.is_some() {
        require_text(errors, "title", title);
        check_max_length(errors, "title", title, MAX_SHORT_TEXT);
    }
    check_max_length(errors, "location", location, MAX_SHORT_TEXT);
    check_range(errors, "duration", duration, MIN_DURATION, MAX_DURATION);
}

/// Reads RFC 3339 timestamps; ones without an offset are taken as UTC.
fn utc_or_naive<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Ok(start) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(start.with_timezone(&Utc)));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}

/// Body of `/Events` writes; carries the owning user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventDto {
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "utc_or_naive")]
    pub start: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
}

impl CreateEventDto {
    pub fn validate(&self) -> Result<NewEvent, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let user_id = require(&mut errors, "userId", self.user_id);
        let details = validate_details(
            &mut errors,
            self.title.as_deref(),
            self.location.as_deref(),
            self.start,
            self.duration,
        );

        match (user_id, details) {
            (Some(user_id), Some(details)) => Ok(details.with_owner(user_id)),
            _ => Err(errors),
        }
    }

    pub fn validate_partial(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_present(
            &mut errors,
            self.title.as_deref(),
            self.location.as_deref(),
            self.duration,
        );
        errors.into_result()
    }

    /// Overwrites the fields that are present, keeping the rest.
    pub fn merge_into(self, event: &mut Event) {
        if let Some(user_id) = self.user_id {
            event.user_id = user_id;
        }
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(location) = self.location {
            event.location = Some(location);
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(duration) = self.duration {
            event.duration = duration;
        }
    }
}

/// Body of `/Users/{id}/Events` writes; the owner comes from the route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserEventDto {
    pub title: Option<String>,
    pub location: Option<String>,
    #[serde(default, deserialize_with = "utc_or_naive")]
    pub start: Option<DateTime<Utc>>,
    pub duration: Option<i32>,
}

impl CreateUserEventDto {
    pub fn new(title: &str, start: DateTime<Utc>, duration: i32) -> Self {
        Self {
            title: Some(title.to_string()),
            location: None,
            start: Some(start),
            duration: Some(duration),
        }
    }

    pub fn at(mut self, location: &str) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn validate(&self) -> Result<EventDetails, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_details(
            &mut errors,
            self.title.as_deref(),
            self.location.as_deref(),
            self.start,
            self.duration,
        )
        .ok_or(errors)
    }

    pub fn validate_partial(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_present(
            &mut errors,
            self.title.as_deref(),
            self.location.as_deref(),
            self.duration,
        );
        errors.into_result()
    }

    pub fn merge_into(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(location) = self.location {
            event.location = Some(location);
        }
        if let Some(start) = self.start {
            event.start = start;
        }
        if let Some(duration) = self.duration {
            event.duration = duration;
        }
    }
}
