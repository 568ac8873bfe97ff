//! Composed relay service: the injectable object owning both the presence
//! registry and the room relay. All transport handlers and maintenance tasks
//! go through these entry points; nothing mutates the shared state directly.

use std::time::Instant;

use bytes::Bytes;

use crate::error::{RelayError, Result};
use crate::limits::RelayLimits;
use crate::presence::{PresenceRegistry, RoomMember};
use crate::relay::{fragment_id, FragmentRecord, RoomRelay};

/// Poll outcome: filtered fragment window plus the live member count.
#[derive(Debug)]
pub struct PollResult {
    pub fragments: Vec<FragmentRecord>,
    pub player_count: usize,
}

/// Maintenance outcome of one sweep pass.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub evicted_players: Vec<String>,
    pub dropped_rooms: Vec<String>,
}

/// RelayService: presence + bounded relay behind one handle.
pub struct RelayService {
    pub presence: PresenceRegistry,
    pub relay: RoomRelay,
}

impl RelayService {
    pub fn new(limits: RelayLimits) -> Self {
        Self {
            presence: PresenceRegistry::new(limits.liveness_timeout),
            relay: RoomRelay::new(limits.queue_cap, limits.poll_window, limits.room_gc_sweeps),
        }
    }

    /// Upsert the player and make sure the room's queue exists.
    /// Always succeeds; echoes the room id.
    pub fn register(&self, player_id: &str, display_name: &str, room_id: &str, now: Instant) -> String {
        self.presence.register(player_id, display_name, room_id, now);
        self.relay.ensure_room(room_id);
        room_id.to_string()
    }

    /// Validate the sender, refresh liveness, and append the fragment.
    /// The caller is responsible for scheduling an asynchronous sweep; it is
    /// advisory maintenance and never part of this call's contract.
    pub fn publish(
        &self,
        sender_id: &str,
        room_id: &str,
        payload: Bytes,
        sequence: u64,
        now: Instant,
    ) -> Result<String> {
        if !self.presence.touch(sender_id, now) {
            return Err(RelayError::UnregisteredSender(sender_id.to_string()));
        }
        let sender_name = self
            .presence
            .display_name(sender_id)
            .unwrap_or_else(|| "Unknown".to_string());

        let record = FragmentRecord {
            fragment_id: fragment_id(),
            sender_id: sender_id.to_string(),
            sender_name,
            payload,
            sequence,
            published_at: now,
        };
        Ok(self.relay.publish(room_id, record))
    }

    /// Validate the receiver, refresh liveness, and read the filtered window.
    /// Fragments the receiver published themselves are never returned.
    pub fn poll(&self, room_id: &str, player_id: &str, now: Instant) -> Result<PollResult> {
        if !self.presence.touch(player_id, now) {
            return Err(RelayError::UnregisteredReceiver(player_id.to_string()));
        }
        Ok(PollResult {
            fragments: self.relay.poll(room_id, player_id),
            player_count: self.presence.player_count(room_id),
        })
    }

    /// Sweep stale entries first, then snapshot the room's membership.
    /// An unknown or empty room yields an empty roster, not an error.
    pub fn list_players(&self, room_id: &str, now: Instant) -> Vec<RoomMember> {
        self.presence.sweep(now);
        self.presence.players_in_room(room_id, now)
    }

    /// Presence-only sweep, for the fire-and-forget path after publish.
    pub fn sweep(&self, now: Instant) -> Vec<String> {
        self.presence.sweep(now)
    }

    /// Full maintenance pass: stale-player eviction plus idle-room GC.
    /// Driven by the periodic sweeper, never by request handlers.
    pub fn run_maintenance(&self, now: Instant) -> SweepReport {
        let evicted_players = self.presence.sweep(now);
        let dropped_rooms = self
            .relay
            .sweep_idle_rooms(|room| self.presence.player_count(room) > 0);
        SweepReport {
            evicted_players,
            dropped_rooms,
        }
    }
}
