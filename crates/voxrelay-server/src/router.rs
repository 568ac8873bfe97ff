//! Axum router wiring for the polling API.

use axum::routing::{get, post};
use axum::Router;

use crate::{app_state::AppState, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(transport::http::health))
        .route("/api/register", post(transport::http::register))
        .route("/api/publish", post(transport::http::publish))
        .route("/api/poll/:room_id/:player_id", get(transport::http::poll))
        .route("/api/players/:room_id", get(transport::http::list_players))
        .with_state(state)
}
