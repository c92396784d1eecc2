//! `/Users/{id}/Events` handlers
//!
//! Every lookup is scoped to the user in the route, so an event id that
//! belongs to someone else is reported as not found.

use axum::extract::{Path, State};
use tracing::{debug, info};

use crate::handlers::extract::Payload;
use crate::handlers::response::{created, found, list, no_content, ok, ApiResult};
use crate::middleware::RequestCancellation;
use crate::models::event::{CreateUserEventDto, EventFilter};
use crate::state::AppState;

pub async fn get_all(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    cancel: RequestCancellation,
) -> ApiResult {
    let events = state
        .services
        .user_events
        .get_all(Some(EventFilter::User(user_id)), &cancel)
        .await?;
    debug!(user_id = user_id, count = events.len(), "User events fetched");
    Ok(list(events))
}

pub async fn get(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i32, i32)>,
    cancel: RequestCancellation,
) -> ApiResult {
    let event = state
        .services
        .user_events
        .get(EventFilter::UserEvent { user_id, id: event_id }, &cancel)
        .await?;
    Ok(found(event_id, event))
}

pub async fn create(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateUserEventDto>,
) -> ApiResult {
    let event = state
        .services
        .user_events
        .create(dto, Some(user_id), &cancel)
        .await?;
    info!(user_id = user_id, event_id = event.id, "User event created");
    Ok(created(format!("/Users/{}/Events/{}", user_id, event.id), event))
}

pub async fn replace(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i32, i32)>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateUserEventDto>,
) -> ApiResult {
    let event = state
        .services
        .user_events
        .replace(EventFilter::UserEvent { user_id, id: event_id }, dto, &cancel)
        .await?;
    Ok(ok(event))
}

pub async fn update(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i32, i32)>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateUserEventDto>,
) -> ApiResult {
    let event = state
        .services
        .user_events
        .update(EventFilter::UserEvent { user_id, id: event_id }, dto, &cancel)
        .await?;
    Ok(ok(event))
}

pub async fn delete(
    State(state): State<AppState>,
    Path((user_id, event_id)): Path<(i32, i32)>,
    cancel: RequestCancellation,
) -> ApiResult {
    state
        .services
        .user_events
        .delete(EventFilter::UserEvent { user_id, id: event_id }, &cancel)
        .await?;
    info!(user_id = user_id, event_id = event_id, "User event deleted");
    Ok(no_content())
}
