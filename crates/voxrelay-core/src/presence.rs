//! Player presence registry with time-based liveness expiry.
//!
//! One entry per active player, keyed by player id. A player belongs to
//! exactly one room at a time; re-registering moves the player. Entries are
//! refreshed by register/publish/poll and evicted by `sweep` once idle past
//! the liveness timeout.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// One active player.
#[derive(Debug, Clone)]
pub struct PresenceEntry {
    pub display_name: String,
    pub room_id: String,
    pub last_seen: Instant,
}

/// Membership snapshot row returned by [`PresenceRegistry::players_in_room`].
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub id: String,
    pub name: String,
    /// Time since the player's last activity, relative to the snapshot instant.
    pub idle: Duration,
}

/// Presence registry: `player_id -> PresenceEntry`.
///
/// All operations take an explicit `now` so callers (and tests) control the
/// clock; the registry never reads wall time itself.
pub struct PresenceRegistry {
    players: DashMap<String, PresenceEntry>,
    liveness_timeout: Duration,
}

impl PresenceRegistry {
    pub fn new(liveness_timeout: Duration) -> Self {
        Self {
            players: DashMap::new(),
            liveness_timeout,
        }
    }

    /// Upsert a player. Idempotent; a later call with a different room moves
    /// the player (single-home invariant holds by construction of the map).
    pub fn register(&self, player_id: &str, display_name: &str, room_id: &str, now: Instant) {
        self.players.insert(
            player_id.to_string(),
            PresenceEntry {
                display_name: display_name.to_string(),
                room_id: room_id.to_string(),
                last_seen: now,
            },
        );
    }

    /// Refresh `last_seen` for a known player. Returns false when the player
    /// is not registered; callers treat that as a hard precondition failure.
    pub fn touch(&self, player_id: &str, now: Instant) -> bool {
        match self.players.get_mut(player_id) {
            Some(mut entry) => {
                entry.last_seen = now;
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    /// Display name snapshot, for attributing fragments at publish time.
    pub fn display_name(&self, player_id: &str) -> Option<String> {
        self.players.get(player_id).map(|e| e.display_name.clone())
    }

    /// Current members of a room. Order is not meaningful to callers.
    pub fn players_in_room(&self, room_id: &str, now: Instant) -> Vec<RoomMember> {
        self.players
            .iter()
            .filter(|e| e.value().room_id == room_id)
            .map(|e| RoomMember {
                id: e.key().clone(),
                name: e.value().display_name.clone(),
                idle: now.saturating_duration_since(e.value().last_seen),
            })
            .collect()
    }

    pub fn player_count(&self, room_id: &str) -> usize {
        self.players
            .iter()
            .filter(|e| e.value().room_id == room_id)
            .count()
    }

    /// Remove every entry idle strictly longer than the liveness timeout,
    /// measured against the single snapshot `now`. Returns the removed ids.
    ///
    /// Eviction re-checks under the entry lock (`remove_if`), so a touch that
    /// lands after the scan keeps the player alive.
    pub fn sweep(&self, now: Instant) -> Vec<String> {
        let stale: Vec<String> = self
            .players
            .iter()
            .filter(|e| now.saturating_duration_since(e.value().last_seen) > self.liveness_timeout)
            .map(|e| e.key().clone())
            .collect();

        let mut removed = Vec::with_capacity(stale.len());
        for id in stale {
            if let Some((id, entry)) = self.players.remove_if(&id, |_, e| {
                now.saturating_duration_since(e.last_seen) > self.liveness_timeout
            }) {
                tracing::info!(player = %id, room = %entry.room_id, "evicted stale player");
                removed.push(id);
            }
        }
        removed
    }
}
