//! Wire-level request/response contracts.
//!
//! Requests are strict (`deny_unknown_fields`) and validated here before the
//! core sees them. The audio payload crosses the wire as base64 text and
//! lives in the core as raw `Bytes`; decode/encode happens at this edge and
//! nowhere else.

use std::time::Instant;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use voxrelay_core::error::{RelayError, Result};
use voxrelay_core::presence::RoomMember;
use voxrelay_core::relay::FragmentRecord;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub player_id: String,
    pub player_name: String,
    pub room_id: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub room: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishRequest {
    pub sender_id: String,
    pub room_id: String,
    /// Base64-encoded audio fragment.
    pub payload: String,
    pub sequence: u64,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub fragment_id: String,
}

#[derive(Debug, Serialize)]
pub struct FragmentDto {
    pub fragment_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub payload: String,
    pub sequence: u64,
    /// Milliseconds since the fragment arrived, at response time.
    pub age_ms: u64,
}

impl FragmentDto {
    pub fn from_record(record: &FragmentRecord, now: Instant) -> Self {
        Self {
            fragment_id: record.fragment_id.clone(),
            sender_id: record.sender_id.clone(),
            sender_name: record.sender_name.clone(),
            payload: encode_payload(&record.payload),
            sequence: record.sequence,
            age_ms: now
                .saturating_duration_since(record.published_at)
                .as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PollResponse {
    pub room: String,
    pub fragments: Vec<FragmentDto>,
    pub player_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PlayerDto {
    pub id: String,
    pub name: String,
    /// Milliseconds since the player's last activity.
    pub idle_ms: u64,
}

impl From<RoomMember> for PlayerDto {
    fn from(m: RoomMember) -> Self {
        Self {
            id: m.id,
            name: m.name,
            idle_ms: m.idle.as_millis() as u64,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub room: String,
    pub players: Vec<PlayerDto>,
    pub count: usize,
}

pub fn decode_payload(s: &str) -> Result<Bytes> {
    BASE64
        .decode(s)
        .map(Bytes::from)
        .map_err(|e| RelayError::BadRequest(format!("payload is not valid base64: {e}")))
}

pub fn encode_payload(b: &Bytes) -> String {
    BASE64.encode(b)
}

/// Identifier fields must be non-blank before the core is touched.
pub fn require_id(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RelayError::BadRequest(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}
