//! Per-room bounded fragment queues.
//!
//! Each room holds a FIFO queue capped at `queue_cap`; the oldest fragments
//! are evicted first. Reads are non-destructive: a fragment stays visible to
//! every poller until capacity pushes it out, which makes delivery
//! at-least-once and repeat-prone on purpose (clients dedup on `sequence`).

use std::collections::VecDeque;
use std::time::Instant;

use bytes::Bytes;
use dashmap::DashMap;
use uuid::Uuid;

/// One published audio fragment. Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct FragmentRecord {
    pub fragment_id: String,
    /// Sender identity snapshotted at publish time, not re-resolved later.
    pub sender_id: String,
    pub sender_name: String,
    /// Opaque encoded audio. `Bytes` keeps fan-out clones refcounted.
    pub payload: Bytes,
    /// Sender-supplied ordering hint, forwarded as-is.
    pub sequence: u64,
    pub published_at: Instant,
}

struct RoomQueue {
    fragments: VecDeque<FragmentRecord>,
    /// Consecutive maintenance sweeps during which the room had no members.
    idle_sweeps: u32,
}

impl RoomQueue {
    fn new() -> Self {
        Self {
            fragments: VecDeque::new(),
            idle_sweeps: 0,
        }
    }
}

/// Room relay: `room_id -> RoomQueue`.
///
/// Append-and-truncate runs while holding the room's entry guard, so
/// concurrent publishes to the same room can neither overshoot the cap nor
/// lose a fragment between the two steps.
pub struct RoomRelay {
    rooms: DashMap<String, RoomQueue>,
    queue_cap: usize,
    poll_window: usize,
    room_gc_sweeps: u32,
}

impl RoomRelay {
    pub fn new(queue_cap: usize, poll_window: usize, room_gc_sweeps: u32) -> Self {
        Self {
            rooms: DashMap::new(),
            queue_cap,
            poll_window,
            room_gc_sweeps,
        }
    }

    /// Lazily create the room's queue. Also resets the idle-sweep counter so
    /// a freshly joined room is not collected out from under its players.
    pub fn ensure_room(&self, room_id: &str) {
        self.rooms
            .entry(room_id.to_string())
            .or_insert_with(RoomQueue::new)
            .idle_sweeps = 0;
    }

    /// Append a fragment, evicting from the front past `queue_cap`.
    /// Returns the generated fragment id.
    pub fn publish(&self, room_id: &str, fragment: FragmentRecord) -> String {
        let fragment_id = fragment.fragment_id.clone();
        let mut queue = self
            .rooms
            .entry(room_id.to_string())
            .or_insert_with(RoomQueue::new);
        queue.fragments.push_back(fragment);
        while queue.fragments.len() > self.queue_cap {
            queue.fragments.pop_front();
        }
        queue.idle_sweeps = 0;
        fragment_id
    }

    /// The last `poll_window` fragments not sent by `excluding_player_id`,
    /// oldest of the selected window first. Non-destructive.
    pub fn poll(&self, room_id: &str, excluding_player_id: &str) -> Vec<FragmentRecord> {
        let Some(queue) = self.rooms.get(room_id) else {
            return Vec::new();
        };
        let mut selected: Vec<FragmentRecord> = queue
            .fragments
            .iter()
            .rev()
            .filter(|f| f.sender_id != excluding_player_id)
            .take(self.poll_window)
            .cloned()
            .collect();
        selected.reverse();
        selected
    }

    /// Full queue snapshot, for tests and diagnostics.
    pub fn fragments(&self, room_id: &str) -> Vec<FragmentRecord> {
        self.rooms
            .get(room_id)
            .map(|q| q.fragments.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn room_len(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map(|q| q.fragments.len()).unwrap_or(0)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Advance idle-room accounting: rooms reported unoccupied accumulate a
    /// sweep count and are dropped after `room_gc_sweeps` consecutive hits.
    /// Returns the dropped room ids.
    pub fn sweep_idle_rooms(&self, is_occupied: impl Fn(&str) -> bool) -> Vec<String> {
        let mut doomed = Vec::new();
        for mut entry in self.rooms.iter_mut() {
            if is_occupied(entry.key()) {
                entry.value_mut().idle_sweeps = 0;
            } else {
                entry.value_mut().idle_sweeps += 1;
                if entry.value().idle_sweeps >= self.room_gc_sweeps {
                    doomed.push(entry.key().clone());
                }
            }
        }

        let mut dropped = Vec::with_capacity(doomed.len());
        for room in doomed {
            // Re-check under the entry lock; a publish or register in the
            // meantime resets the counter and saves the room.
            if self
                .rooms
                .remove_if(&room, |_, q| q.idle_sweeps >= self.room_gc_sweeps)
                .is_some()
            {
                tracing::info!(room = %room, "dropped idle room queue");
                dropped.push(room);
            }
        }
        dropped
    }
}

/// Short fragment token: 8 hex chars of a v4 uuid. Uniqueness only has to
/// hold within one room's retention window, never globally.
pub fn fragment_id() -> String {
    let mut buf = Uuid::encode_buffer();
    let hex = Uuid::new_v4().simple().encode_lower(&mut buf);
    hex[..8].to_string()
}
