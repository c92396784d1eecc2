//! `/DemoData`

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::handlers::response::ApiResult;
use crate::middleware::RequestCancellation;
use crate::state::AppState;

pub async fn seed(State(state): State<AppState>, cancel: RequestCancellation) -> ApiResult {
    state.services.demo_data.seed(&cancel).await?;
    Ok(StatusCode::OK.into_response())
}
