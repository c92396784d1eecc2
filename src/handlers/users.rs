//! `/Users` handlers

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use tracing::{debug, info};

use crate::handlers::extract::Payload;
use crate::handlers::response::{created, found, list, no_content, ok, ApiResult};
use crate::middleware::RequestCancellation;
use crate::models::user::{CreateUserDto, UserFilter};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    #[serde(default)]
    pub include_events: bool,
}

pub async fn get_all(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
    cancel: RequestCancellation,
) -> ApiResult {
    let users = state
        .services
        .users
        .get_all_with_events(None, query.include_events, &cancel)
        .await?;
    debug!(count = users.len(), "Users fetched");
    Ok(list(users))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<UserQuery>,
    cancel: RequestCancellation,
) -> ApiResult {
    let user = state
        .services
        .users
        .get_with_events(UserFilter::Id(id), query.include_events, &cancel)
        .await?;
    debug!(user_id = id, found = user.is_some(), "User fetched");
    Ok(found(id, user))
}

pub async fn create(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateUserDto>,
) -> ApiResult {
    let user = state.services.users.create(dto, None, &cancel).await?;
    info!(user_id = user.id, "User created");
    Ok(created(format!("/Users/{}", user.id), user))
}

pub async fn replace(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateUserDto>,
) -> ApiResult {
    let user = state.services.users.replace(UserFilter::Id(id), dto, &cancel).await?;
    Ok(ok(user))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
    Payload(dto): Payload<CreateUserDto>,
) -> ApiResult {
    let user = state.services.users.update(UserFilter::Id(id), dto, &cancel).await?;
    Ok(ok(user))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    cancel: RequestCancellation,
) -> ApiResult {
    state.services.users.delete(UserFilter::Id(id), &cancel).await?;
    info!(user_id = id, "User deleted");
    Ok(no_content())
}
