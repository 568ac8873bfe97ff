//! Periodic maintenance task: stale-player eviction plus idle-room GC.
//!
//! Runs on a fixed interval off the request path. The per-publish sweep in
//! the handlers covers presence only; room GC happens here exclusively, so a
//! burst of publishes can never collect a room.

use std::time::Instant;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::app_state::AppState;

pub fn spawn(app: AppState) -> JoinHandle<()> {
    let interval = app.cfg().relay.sweep_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let report = app.relay().run_maintenance(Instant::now());
            if !report.evicted_players.is_empty() || !report.dropped_rooms.is_empty() {
                tracing::info!(
                    evicted_players = report.evicted_players.len(),
                    dropped_rooms = report.dropped_rooms.len(),
                    "maintenance sweep"
                );
            }
        }
    })
}
