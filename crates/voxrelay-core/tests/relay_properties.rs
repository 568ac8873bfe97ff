//! End-to-end properties of the presence + bounded-relay state machine.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::{Duration, Instant};

use bytes::Bytes;

use voxrelay_core::error::RelayError;
use voxrelay_core::{RelayLimits, RelayService};

fn service() -> RelayService {
    RelayService::new(RelayLimits::default())
}

fn blob(tag: &str) -> Bytes {
    Bytes::from(tag.as_bytes().to_vec())
}

#[test]
fn register_echoes_room_and_creates_queue() {
    let svc = service();
    let now = Instant::now();
    let room = svc.register("p1", "Pat", "r1", now);
    assert_eq!(room, "r1");
    assert_eq!(svc.relay.room_count(), 1);
    assert_eq!(svc.relay.room_len("r1"), 0);
}

#[test]
fn reregistration_moves_player_not_multihomes() {
    let svc = service();
    let now = Instant::now();
    svc.register("p1", "Pat", "r1", now);
    svc.register("p1", "Pat", "r2", now);

    assert!(svc.presence.players_in_room("r1", now).is_empty());
    let members = svc.presence.players_in_room("r2", now);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, "p1");
}

#[test]
fn queue_never_exceeds_cap_and_keeps_newest_in_order() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);

    for seq in 1..=60u64 {
        svc.publish("a", "r1", blob("x"), seq, now).unwrap();
    }

    let retained = svc.relay.fragments("r1");
    assert_eq!(retained.len(), 50);
    let sequences: Vec<u64> = retained.iter().map(|f| f.sequence).collect();
    let expected: Vec<u64> = (11..=60).collect();
    assert_eq!(sequences, expected);
}

#[test]
fn poll_excludes_own_fragments() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);
    svc.register("b", "B", "r1", now);

    svc.publish("a", "r1", blob("from-a"), 1, now).unwrap();

    let for_b = svc.poll("r1", "b", now).unwrap();
    assert_eq!(for_b.fragments.len(), 1);
    assert_eq!(for_b.fragments[0].sender_id, "a");
    assert_eq!(for_b.fragments[0].sender_name, "A");
    assert_eq!(for_b.player_count, 2);

    let for_a = svc.poll("r1", "a", now).unwrap();
    assert!(for_a.fragments.is_empty());
    assert_eq!(for_a.player_count, 2);
}

#[test]
fn poll_window_returns_most_recent_in_arrival_order() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);
    svc.register("b", "B", "r1", now);

    for seq in 1..=15u64 {
        svc.publish("a", "r1", blob("x"), seq, now).unwrap();
    }

    let result = svc.poll("r1", "b", now).unwrap();
    assert_eq!(result.fragments.len(), 10);
    let sequences: Vec<u64> = result.fragments.iter().map(|f| f.sequence).collect();
    let expected: Vec<u64> = (6..=15).collect();
    assert_eq!(sequences, expected);
}

#[test]
fn poll_window_skips_own_fragments_before_counting() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);
    svc.register("b", "B", "r1", now);

    // Interleave so B's own fragments sit inside the tail of the queue.
    for seq in 1..=12u64 {
        let sender = if seq % 2 == 0 { "b" } else { "a" };
        svc.publish(sender, "r1", blob("x"), seq, now).unwrap();
    }

    let result = svc.poll("r1", "b", now).unwrap();
    let sequences: Vec<u64> = result.fragments.iter().map(|f| f.sequence).collect();
    assert_eq!(sequences, vec![1, 3, 5, 7, 9, 11]);
    assert!(result.fragments.iter().all(|f| f.sender_id != "b"));
}

#[test]
fn poll_is_non_destructive() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);
    svc.register("b", "B", "r1", now);
    svc.publish("a", "r1", blob("x"), 1, now).unwrap();

    let first = svc.poll("r1", "b", now).unwrap();
    let second = svc.poll("r1", "b", now).unwrap();
    assert_eq!(first.fragments.len(), 1);
    assert_eq!(second.fragments.len(), 1);
    assert_eq!(first.fragments[0].fragment_id, second.fragments[0].fragment_id);
}

#[test]
fn polling_unknown_room_yields_empty_not_error() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);

    let result = svc.poll("nowhere", "a", now).unwrap();
    assert!(result.fragments.is_empty());
    assert_eq!(result.player_count, 0);
}

#[test]
fn publish_from_unknown_sender_fails() {
    let svc = service();
    let err = svc
        .publish("ghost", "r1", blob("x"), 1, Instant::now())
        .unwrap_err();
    assert!(matches!(err, RelayError::UnregisteredSender(_)));
    assert_eq!(err.client_code().as_str(), "UNREGISTERED_SENDER");
}

#[test]
fn poll_from_unknown_receiver_fails() {
    let svc = service();
    let err = svc.poll("r1", "ghost", Instant::now()).unwrap_err();
    assert!(matches!(err, RelayError::UnregisteredReceiver(_)));
    assert_eq!(err.client_code().as_str(), "UNREGISTERED_RECEIVER");
}

#[test]
fn sweep_evicts_idle_players_past_threshold() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("c", "C", "r1", t0);

    // Exactly at the threshold: survives (strict comparison).
    let removed = svc.presence.sweep(t0 + Duration::from_secs(30));
    assert!(removed.is_empty());

    let removed = svc.presence.sweep(t0 + Duration::from_secs(31));
    assert_eq!(removed, vec!["c".to_string()]);
    assert!(svc
        .presence
        .players_in_room("r1", t0 + Duration::from_secs(31))
        .is_empty());

    // A swept player can no longer publish.
    let err = svc
        .publish("c", "r1", blob("x"), 1, t0 + Duration::from_secs(31))
        .unwrap_err();
    assert!(matches!(err, RelayError::UnregisteredSender(_)));
}

#[test]
fn touch_within_threshold_keeps_player_alive() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("d", "D", "r1", t0);
    assert!(svc.presence.touch("d", t0 + Duration::from_secs(20)));

    let removed = svc.presence.sweep(t0 + Duration::from_secs(31));
    assert!(removed.is_empty());
    assert!(svc.presence.is_registered("d"));
}

#[test]
fn sweep_uses_its_snapshot_time_not_per_entry_rereads() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("e", "E", "r1", t0);

    // Touch lands after the sweep's reference time was captured.
    let sweep_now = t0 + Duration::from_secs(31);
    assert!(svc.presence.touch("e", t0 + Duration::from_secs(32)));

    let removed = svc.presence.sweep(sweep_now);
    assert!(removed.is_empty());
    assert!(svc.presence.is_registered("e"));
}

#[test]
fn touch_on_unknown_player_is_a_precondition_failure() {
    let svc = service();
    assert!(!svc.presence.touch("nobody", Instant::now()));
}

#[test]
fn list_players_sweeps_first() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("a", "A", "r1", t0);
    svc.register("b", "B", "r1", t0 + Duration::from_secs(20));

    let roster = svc.list_players("r1", t0 + Duration::from_secs(31));
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, "b");
    assert_eq!(roster[0].idle, Duration::from_secs(11));
}

#[test]
fn fragment_ids_are_unique_within_retention_window() {
    let svc = service();
    let now = Instant::now();
    svc.register("a", "A", "r1", now);

    let mut ids: Vec<String> = (0..50)
        .map(|seq| svc.publish("a", "r1", blob("x"), seq, now).unwrap())
        .collect();
    assert!(ids.iter().all(|id| id.len() == 8));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 50);
}

#[test]
fn idle_rooms_are_dropped_after_consecutive_empty_sweeps() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("a", "A", "r1", t0);
    svc.publish("a", "r1", blob("x"), 1, t0).unwrap();

    // Player goes stale; room becomes unoccupied.
    svc.run_maintenance(t0 + Duration::from_secs(31));
    assert_eq!(svc.relay.room_count(), 1);

    let report = svc.run_maintenance(t0 + Duration::from_secs(41));
    assert!(report.dropped_rooms.is_empty());

    let report = svc.run_maintenance(t0 + Duration::from_secs(51));
    assert_eq!(report.dropped_rooms, vec!["r1".to_string()]);
    assert_eq!(svc.relay.room_count(), 0);

    // Re-registering recreates the queue from scratch.
    svc.register("a", "A", "r1", t0 + Duration::from_secs(60));
    assert_eq!(svc.relay.room_count(), 1);
    assert_eq!(svc.relay.room_len("r1"), 0);
}

#[test]
fn occupied_rooms_survive_maintenance() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("a", "A", "r1", t0);

    for i in 1..=5u64 {
        assert!(svc.presence.touch("a", t0 + Duration::from_secs(i)));
        let report = svc.run_maintenance(t0 + Duration::from_secs(i));
        assert!(report.dropped_rooms.is_empty());
    }
    assert_eq!(svc.relay.room_count(), 1);
}

#[test]
fn sender_identity_is_snapshotted_at_publish_time() {
    let svc = service();
    let t0 = Instant::now();
    svc.register("a", "Old Name", "r1", t0);
    svc.register("b", "B", "r1", t0);
    svc.publish("a", "r1", blob("x"), 1, t0).unwrap();

    // Rename after publishing; the stored fragment keeps the old name.
    svc.register("a", "New Name", "r1", t0);
    let result = svc.poll("r1", "b", t0).unwrap();
    assert_eq!(result.fragments[0].sender_name, "Old Name");
}
