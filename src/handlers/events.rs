//! `/Events` handlers

use axum::extract::{Path, State};
use tracing::{debug, info};

use crate::handlers::extract::Payload;
use crate::handlers::response::{created, found, list, no_content, ok, ApiResult};
use crate::middleware::RequestCancellation;
use crate::models::event::{CreateEventDto, EventFilter};
use crate::state::AppState;

pub async fn get_all(State(state): State<AppState>, cancel: RequestCancellation) -> ApiResult {
    let events = state.services.events.get_all(None, &cancel).await?;
    debug!(count = events.len(), "Events fetched");
    Ok(list(events))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
) -> ApiResult {
    let event = state.services.events.get(EventFilter::Id(id), &cancel).await?;
    Ok(found(id, event))
}

pub async fn create(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateEventDto>,
) -> ApiResult {
    let event = state.services.events.create(dto, None, &cancel).await?;
    info!(event_id = event.id, user_id = event.user_id, "Event created");
    Ok(created(format!("/Events/{}", event.id), event))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateEventDto>,
) -> ApiResult {
    let event = state.services.events.replace(EventFilter::Id(id), dto, &cancel).await?;
    Ok(ok(event))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateEventDto>,
) -> ApiResult {
    let event = state.services.events.update(EventFilter::Id(id), dto, &cancel).await?;
    Ok(ok(event))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
) -> ApiResult {
    state.services.events.delete(EventFilter::Id(id), &cancel).await?;
    info!(event_id = id, "Event deleted");
    Ok(no_content())
}
