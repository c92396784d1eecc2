//! Test data builders

use chrono::{DateTime, TimeZone, Utc};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};
use UserEvents::models::event::{CreateEventDto, CreateUserEventDto};
use UserEvents::models::user::CreateUserDto;

pub fn dance_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1955, 11, 12, 20, 0, 0).unwrap()
}

pub fn marty() -> CreateUserDto {
    CreateUserDto::new("Marty", "McFly")
        .with_notes("If you put your mind to it, you can accomplish anything.")
}

/// A user with a generated name.
pub fn random_user() -> CreateUserDto {
    let first: String = FirstName().fake();
    let last: String = LastName().fake();
    CreateUserDto::new(&first, &last)
}

pub fn dance() -> CreateUserEventDto {
    CreateUserEventDto::new("Enchantment Under the Sea", dance_start(), 90)
        .at("Hill Valley High School")
}

pub fn event_for(user_id: i32, title: &str, duration: i32) -> CreateEventDto {
    CreateEventDto {
        user_id: Some(user_id),
        title: Some(title.to_string()),
        location: None,
        start: Some(dance_start()),
        duration: Some(duration),
    }
}

pub fn marty_json() -> Value {
    json!({
        "firstName": "Marty",
        "lastName": "McFly",
        "notes": "If you put your mind to it, you can accomplish anything."
    })
}

pub fn dance_json() -> Value {
    json!({
        "title": "Enchantment Under the Sea",
        "location": "Hill Valley High School",
        "start": "1955-11-12T20:00:00Z",
        "duration": 90
    })
}
