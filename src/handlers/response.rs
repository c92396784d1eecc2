//! Response helpers shared by every handler
//!
//! Errors become responses here: a missing entity is a 404, validation
//! failures are a 400 problem-details document, and anything else is a 400
//! whose body is the error message.

use std::collections::BTreeMap;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::utils::errors::UserEventsError;

pub type ApiResult = Result<Response, UserEventsError>;

const VALIDATION_TITLE: &str = "One or more validation errors occurred.";
const VALIDATION_TYPE: &str = "https://tools.ietf.org/html/rfc9110#section-15.5.1";

/// RFC 9457 problem details for validation failures.
#[derive(Debug, Serialize)]
pub struct ValidationProblem<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub errors: &'a BTreeMap<String, Vec<String>>,
}

impl IntoResponse for UserEventsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_client_error() {
            warn!(status = %status, error = %self, "Request failed");
        } else {
            error!(status = %status, error = %self, "Request failed");
        }

        match &self {
            UserEventsError::Validation(errors) => {
                let problem = ValidationProblem {
                    kind: VALIDATION_TYPE,
                    title: VALIDATION_TITLE,
                    status: status.as_u16(),
                    errors: errors.as_map(),
                };
                (
                    status,
                    [(header::CONTENT_TYPE, "application/problem+json")],
                    Json(problem),
                )
                    .into_response()
            }
            _ => (status, self.to_string()).into_response(),
        }
    }
}

/// 404 for a single entity lookup that found nothing.
pub fn not_found(id: i32) -> Response {
    let message = format!("Id: {} was not found.", id);
    warn!("{}", message);
    (StatusCode::NOT_FOUND, message).into_response()
}

/// 404 for a listing that came back empty.
pub fn none_found() -> Response {
    warn!("No records were found.");
    (StatusCode::NOT_FOUND, "No records were found.").into_response()
}

/// 200 with the list, or 404 when it is empty.
pub fn list<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        none_found()
    } else {
        Json(items).into_response()
    }
}

/// 200 with the entity, or 404 naming the id.
pub fn found<T: Serialize>(id: i32, item: Option<T>) -> Response {
    match item {
        Some(item) => Json(item).into_response(),
        None => not_found(id),
    }
}

pub fn ok<T: Serialize>(item: T) -> Response {
    Json(item).into_response()
}

/// 201 with a `Location` header pointing at the new resource.
pub fn created<T: Serialize>(location: String, item: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    )
        .into_response()
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
