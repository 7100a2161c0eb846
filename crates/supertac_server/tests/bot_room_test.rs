//! Rooms against the computer: scheduling, re-validation and cancellation.

mod common;

use common::{fast_ai, pid, RecordingOutbox};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;
use supertac_ai::Difficulty;
use supertac_rules::{Mark, Move};
use supertac_server::{bot_player_id, MatchOutcome, PlayerKind, RoomId, RoomRegistry, RoomStatus, ServerEvent};

fn registry_with_delay(delay_ms: u64) -> (RoomRegistry, Arc<RecordingOutbox>) {
    let outbox = Arc::new(RecordingOutbox::default());
    let registry = RoomRegistry::new(outbox.clone(), fast_ai().with_think_delay_ms(delay_ms));
    (registry, outbox)
}

/// Polls until `done` holds, failing after a few seconds.
async fn wait_for(mut done: impl FnMut() -> bool) {
    for _ in 0..500 {
        if done() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

fn alice_to_move(registry: &RoomRegistry, room: &RoomId) -> bool {
    registry
        .get(room)
        .is_none_or(|c| c.snapshot().turn_owner().as_deref() == Some("alice"))
}

#[tokio::test]
async fn test_bot_room_starts_with_human_to_move() {
    let (registry, outbox) = registry_with_delay(0);
    let room = registry.create_bot_room("solo".to_string(), &pid("alice"), Difficulty::Hard);

    assert_eq!(outbox.names("alice"), ["gameStart", "turnChange"]);
    let events = outbox.to("alice");
    let ServerEvent::GameStart { players, .. } = &events[0].event else {
        panic!("expected gameStart");
    };
    assert_eq!(players[1].id, bot_player_id(&room));
    assert_eq!(players[1].kind, PlayerKind::Bot(Difficulty::Hard));
    assert_eq!(*registry.list_rooms()[0].status(), RoomStatus::InProgress);
    assert!(outbox.to(&bot_player_id(&room)).is_empty());
}

#[tokio::test]
async fn test_bot_answers_human_move() {
    let (registry, outbox) = registry_with_delay(0);
    let room = registry.create_bot_room("solo".to_string(), &pid("alice"), Difficulty::Medium);
    outbox.clear();

    registry.make_move(&room, &pid("alice"), Move::new(4, 4), None).expect("legal");
    wait_for(|| alice_to_move(&registry, &room)).await;

    let snapshot = registry.get(&room).expect("live").snapshot();
    let board = snapshot.board().expect("started");
    assert_eq!(board.filled_cells(), 2);
    assert_eq!(board.current_player(), Mark::X);
    assert_eq!(
        outbox.names("alice"),
        ["moveMade", "turnChange", "moveConfirmed", "moveMade", "turnChange"]
    );
}

#[tokio::test]
async fn test_stale_and_illegal_bot_answers() {
    // The scheduled search sleeps long enough to stay out of the way.
    let (registry, outbox) = registry_with_delay(60_000);
    let room = registry.create_bot_room("solo".to_string(), &pid("alice"), Difficulty::Easy);
    registry.make_move(&room, &pid("alice"), Move::new(0, 4), None).expect("legal");
    outbox.clear();

    registry.commit_bot_move(&room, 0, Move::new(4, 0));
    assert!(outbox.all().is_empty(), "stale ply must be discarded");

    // Board 3 is not the active board, so the first legal move is used instead.
    registry.commit_bot_move(&room, 1, Move::new(3, 3));
    let snapshot = registry.get(&room).expect("live").snapshot();
    let board = snapshot.board().expect("started");
    assert_eq!(board.cell(4, 0).and_then(|c| c.mark()), Some(Mark::O));
    assert_eq!(snapshot.turn_owner().as_deref(), Some("alice"));

    registry.commit_bot_move(&room, 1, Move::new(0, 0));
    assert_eq!(registry.get(&room).expect("live").snapshot().ply(), 2);
}

#[tokio::test]
async fn test_leaving_cancels_pending_search_and_discards_answer() {
    let (registry, outbox) = registry_with_delay(60_000);
    let room = registry.create_bot_room("solo".to_string(), &pid("alice"), Difficulty::Hard);
    registry.make_move(&room, &pid("alice"), Move::new(4, 4), None).expect("legal");

    let coordinator = registry.get(&room).expect("live");
    let turn = coordinator.prepare_bot_turn(&fast_ai().search_config()).expect("bot to move");
    assert!(!turn.cancel.load(Ordering::Relaxed));
    outbox.clear();

    registry.leave_room(&room, &pid("alice")).expect("seated");
    assert!(turn.cancel.load(Ordering::Relaxed));
    assert!(registry.is_empty());

    registry.commit_bot_move(&room, turn.ply, Move::new(4, 0));
    assert!(outbox.all().is_empty());
}

#[tokio::test]
async fn test_full_match_against_bot_reaches_a_result() {
    let (registry, outbox) = registry_with_delay(0);
    let room = registry.create_bot_room("solo".to_string(), &pid("alice"), Difficulty::Easy);
    let mut rng = StdRng::seed_from_u64(4);

    while let Some(coordinator) = registry.get(&room) {
        let snapshot = coordinator.snapshot();
        let board = snapshot.board().expect("started").clone();
        let mv = *board.legal_moves().choose(&mut rng).expect("open position");
        if registry.make_move(&room, &pid("alice"), mv, None).expect("legal") == RoomStatus::Finished {
            break;
        }
        wait_for(|| alice_to_move(&registry, &room)).await;
    }

    assert!(registry.get(&room).is_none());
    let last = outbox.to("alice").pop().expect("events");
    assert!(matches!(
        last.event,
        ServerEvent::GameOver { outcome: MatchOutcome::Won { .. } | MatchOutcome::Draw }
    ));
}
