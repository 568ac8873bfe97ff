//! Route handlers.
//!
//! Handlers validate the wire shapes, hand well-typed values to the core, and
//! map `RelayError` to an HTTP status plus a stable JSON error body. The
//! post-publish presence sweep is spawned fire-and-forget; it never delays or
//! fails the response that triggered it.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use voxrelay_core::error::{ClientCode, RelayError};

use crate::app_state::AppState;
use crate::transport::wire::{
    self, FragmentDto, PlayersResponse, PollResponse, PublishRequest, PublishResponse,
    RegisterRequest, RegisterResponse,
};

pub struct ApiError(RelayError);

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.0.client_code();
        let status = match code {
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = json!({
            "error": { "code": code.as_str(), "msg": self.0.to_string() }
        });
        (status, Json(body)).into_response()
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "online" }))
}

pub async fn register(
    State(app): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, ApiError> {
    wire::require_id("player_id", &req.player_id)?;
    wire::require_id("room_id", &req.room_id)?;

    let room = app
        .relay()
        .register(&req.player_id, &req.player_name, &req.room_id, Instant::now());
    tracing::info!(player = %req.player_id, name = %req.player_name, room = %room, "player registered");
    Ok(Json(RegisterResponse { room }))
}

pub async fn publish(
    State(app): State<AppState>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<PublishResponse>, ApiError> {
    wire::require_id("sender_id", &req.sender_id)?;
    wire::require_id("room_id", &req.room_id)?;
    let payload = wire::decode_payload(&req.payload)?;

    let fragment_id = app.relay().publish(
        &req.sender_id,
        &req.room_id,
        payload,
        req.sequence,
        Instant::now(),
    )?;
    tracing::debug!(fragment = %fragment_id, sender = %req.sender_id, room = %req.room_id, "fragment published");

    // Advisory maintenance, detached from this response.
    let state = app.clone();
    tokio::spawn(async move {
        state.relay().sweep(Instant::now());
    });

    Ok(Json(PublishResponse { fragment_id }))
}

pub async fn poll(
    State(app): State<AppState>,
    Path((room_id, player_id)): Path<(String, String)>,
) -> Result<Json<PollResponse>, ApiError> {
    let now = Instant::now();
    let result = app.relay().poll(&room_id, &player_id, now)?;
    let fragments = result
        .fragments
        .iter()
        .map(|f| FragmentDto::from_record(f, now))
        .collect();
    Ok(Json(PollResponse {
        room: room_id,
        fragments,
        player_count: result.player_count,
    }))
}

pub async fn list_players(
    State(app): State<AppState>,
    Path(room_id): Path<String>,
) -> Json<PlayersResponse> {
    let players: Vec<_> = app
        .relay()
        .list_players(&room_id, Instant::now())
        .into_iter()
        .map(Into::into)
        .collect();
    let count = players.len();
    Json(PlayersResponse {
        room: room_id,
        players,
        count,
    })
}
