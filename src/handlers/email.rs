//! `/Email` contact form

use axum::extract::State;

use crate::handlers::extract::Payload;
use crate::handlers::response::{no_content, ApiResult};
use crate::middleware::RequestCancellation;
use crate::models::email::EmailDto;
use crate::state::AppState;

pub async fn send(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Payload(dto): Payload<EmailDto>,
) -> ApiResult {
    state.services.email.send(dto, &cancel).await?;
    Ok(no_content())
}
