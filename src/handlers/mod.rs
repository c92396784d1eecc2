//! HTTP handlers module
//!
//! This module contains the axum handlers organized by resource:
//! - Users and their nested events
//! - The flat events resource
//! - Health, contact email, demo data and the live console

pub mod console;
pub mod demo_data;
pub mod email;
pub mod events;
pub mod extract;
pub mod health;
pub mod response;
pub mod user_events;
pub mod users;

use axum::routing::{get, post};
use axum::{Extension, Router};
use tokio_util::sync::CancellationToken;

use crate::middleware::{trace_layer, ShutdownToken};
use crate::state::AppState;

/// Builds the application router.
///
/// `shutdown` closes long-lived `/consoleHub` streams; ordinary requests
/// are left to finish.
pub fn router(state: AppState, shutdown: CancellationToken) -> Router {
    Router::new()
        .route("/Users", get(users::get_all).post(users::create))
        .route(
            "/Users/{id}",
            get(users::get)
                .put(users::replace)
                .patch(users::update)
                .delete(users::delete),
        )
        .route(
            "/Users/{id}/Events",
            get(user_events::get_all).post(user_events::create),
        )
        .route(
            "/Users/{id}/Events/{event_id}",
            get(user_events::get)
                .put(user_events::replace)
                .patch(user_events::update)
                .delete(user_events::delete),
        )
        .route("/Events", get(events::get_all).post(events::create))
        .route(
            "/Events/{id}",
            get(events::get)
                .put(events::replace)
                .patch(events::update)
                .delete(events::delete),
        )
        .route("/Health", get(health::check))
        .route("/Email", post(email::send))
        .route("/DemoData", get(demo_data::seed))
        .route("/consoleHub", get(console::connect))
        .layer(Extension(ShutdownToken(shutdown)))
        .layer(trace_layer())
        .with_state(state)
}
