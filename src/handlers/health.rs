//! `/Health`

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;

use crate::handlers::response::ApiResult;
use crate::middleware::RequestCancellation;
use crate::state::AppState;

pub async fn check(State(state): State<AppState>, cancel: RequestCancellation) -> ApiResult {
    let result = state.services.health.check(&cancel).await?;
    let cache_control = format!(
        "public, max-age={}",
        state.settings.health.response_max_age_seconds
    );
    Ok(([(header::CACHE_CONTROL, cache_control)], Json(result)).into_response())
}
