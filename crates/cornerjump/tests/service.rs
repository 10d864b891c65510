//! Integration tests for the service facade and the frame dispatcher.

use std::sync::Arc;
use std::time::Duration;

use cornerjump::{
    ClientRequest, ConclusionReason, Coord, CreateMatch, EngineError, ErrorCode, JoinMatch,
    MatchConcluded, MatchConfig, MatchId, MatchOutbound, MatchService, MoveId, Outcome, PlayerId,
    ServerReply, Side, Snapshot, SubmitMove,
};
use serde_json::json;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

const ALICE: PlayerId = PlayerId(11);
const BOB: PlayerId = PlayerId(22);

fn service_with(config: MatchConfig) -> (MatchService, mpsc::UnboundedReceiver<MatchConcluded>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let service = MatchService::builder()
        .config(config)
        .outcome_sink(tx)
        .build();
    (service, rx)
}

fn service() -> (MatchService, mpsc::UnboundedReceiver<MatchConcluded>) {
    service_with(MatchConfig::default())
}

fn create_request() -> CreateMatch {
    CreateMatch {
        match_id: None,
        first_player_id: ALICE,
        second_player_id: BOB,
        blockers_enabled: false,
    }
}

/// The participant whose turn it is, and a legal Defender step for them.
fn opening_step(snapshot: &Snapshot, move_id: &str) -> SubmitMove {
    let (player, from, to) = match snapshot.turn {
        Side::First => (snapshot.first_player_id, Coord::new(6, 4), Coord::new(5, 4)),
        Side::Second => (snapshot.second_player_id, Coord::new(1, 4), Coord::new(2, 4)),
    };
    SubmitMove {
        match_id: snapshot.match_id,
        participant_id: player,
        move_id: MoveId::from(move_id),
        from,
        to,
        is_capture: false,
        captured_squares: vec![],
    }
}

fn error_code(err: &EngineError) -> ErrorCode {
    err.code()
}

async fn frame(service: &MatchService, caller: Option<PlayerId>, body: serde_json::Value) -> ServerReply {
    let bytes = serde_json::to_vec(&body).unwrap();
    let reply = service.handle_frame(caller, &bytes).await.unwrap();
    serde_json::from_slice(&reply).unwrap()
}

fn reply_code(reply: &ServerReply) -> ErrorCode {
    match reply {
        ServerReply::Error(err) => err.error_code,
        other => panic!("expected an error reply, got {other:?}"),
    }
}

// =========================================================================
// Operations
// =========================================================================

#[tokio::test]
async fn test_create_match_returns_opening_snapshot() {
    let (service, _outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();

    assert_eq!(snapshot.first_player_id, ALICE);
    assert_eq!(snapshot.second_player_id, BOB);
    assert!(!snapshot.ended);
    assert_eq!(snapshot.winner, None);
    assert_eq!(snapshot.pieces[0][3], Some('q'));
    assert_eq!(snapshot.pieces[7][0], Some('R'));
    assert_eq!(service.match_count().await, 1);
}

#[tokio::test]
async fn test_create_match_with_blockers_places_blockers() {
    let (service, _outcomes) = service();
    let mut request = create_request();
    request.blockers_enabled = true;
    let snapshot = service.create_match(request).await.unwrap();

    assert!(snapshot.blockers_enabled);
    assert_eq!(snapshot.pieces[6][2], Some('X'));
    assert_eq!(snapshot.pieces[1][5], Some('x'));
}

#[tokio::test]
async fn test_join_unknown_match_not_found() {
    let (service, _outcomes) = service();
    let err = service.join(MatchId(424_242), ALICE).await.unwrap_err();
    assert_eq!(error_code(&err), ErrorCode::MatchNotFound);
}

#[tokio::test]
async fn test_submit_move_then_duplicate_is_idempotent() {
    let (service, _outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();
    let request = opening_step(&snapshot, "opening");

    let accepted = service.submit_move(request.clone()).await.unwrap();
    assert!(accepted.event.is_some());
    assert_eq!(accepted.snapshot.turn, snapshot.turn.opponent());

    let replay = service.submit_move(request).await.unwrap();
    assert!(replay.event.is_none());
    assert_eq!(replay.snapshot, accepted.snapshot);
}

#[tokio::test]
async fn test_feed_receives_moves_but_not_rejections() {
    let (service, _outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel();
    service
        .join_with_feed(snapshot.match_id, BOB, feed_tx)
        .await
        .unwrap();

    // A two-square Defender step is illegal and must not be broadcast.
    let mut bad = opening_step(&snapshot, "bad");
    bad.to = Coord::new(bad.from.row + 2 * (bad.to.row - bad.from.row), bad.from.col);
    let err = service.submit_move(bad).await.unwrap_err();
    assert_eq!(error_code(&err), ErrorCode::IllegalMove);
    assert!(feed_rx.try_recv().is_err());

    service
        .submit_move(opening_step(&snapshot, "good"))
        .await
        .unwrap();
    assert!(matches!(
        feed_rx.recv().await.unwrap(),
        MatchOutbound::Moved { .. }
    ));
}

#[tokio::test]
async fn test_forfeit_reports_outcome_once() {
    let (service, mut outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();

    let ended = service.forfeit(snapshot.match_id, BOB).await.unwrap();
    assert!(ended.ended);
    assert_eq!(ended.winner, Some(Outcome::First));

    let concluded = outcomes.recv().await.unwrap();
    assert_eq!(concluded.match_id, snapshot.match_id);
    assert_eq!(concluded.winner, Outcome::First);
    assert_eq!(concluded.reason, ConclusionReason::Forfeit);

    let err = service
        .submit_move(opening_step(&snapshot, "late"))
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), ErrorCode::GameEnded);
    assert!(outcomes.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_mark_disconnected_uses_configured_grace() {
    let (service, mut outcomes) = service_with(MatchConfig {
        reconnect_grace: Duration::from_secs(20),
        ..MatchConfig::default()
    });
    let snapshot = service.create_match(create_request()).await.unwrap();

    service
        .mark_disconnected(snapshot.match_id, ALICE, None)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(19)).await;
    assert!(outcomes.try_recv().is_err());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let concluded = outcomes.recv().await.unwrap();
    assert_eq!(concluded.winner, Outcome::Second);
    assert_eq!(concluded.reason, ConclusionReason::Disconnect);
}

#[tokio::test(start_paused = true)]
async fn test_mark_connected_cancels_forfeit() {
    let (service, mut outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();

    service
        .mark_disconnected(snapshot.match_id, BOB, Some(Duration::from_secs(5)))
        .await
        .unwrap();
    service.mark_connected(snapshot.match_id, BOB).await.unwrap();
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert!(outcomes.try_recv().is_err());
    let info = service.match_info(snapshot.match_id).await.unwrap();
    assert!(!info.is_ended());
}

#[tokio::test]
async fn test_mark_disconnected_huge_grace_is_bad_payload() {
    let (service, mut outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();

    let err = service
        .mark_disconnected(snapshot.match_id, ALICE, Some(Duration::MAX))
        .await
        .unwrap_err();
    assert_eq!(error_code(&err), ErrorCode::BadPayload);

    // The match keeps running.
    assert!(service.join(snapshot.match_id, BOB).await.is_ok());
    assert!(outcomes.try_recv().is_err());
}

// =========================================================================
// Purging
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_purge_idle_only_removes_due_matches() {
    let (service, _outcomes) = service_with(MatchConfig {
        idle_retention: Duration::from_secs(600),
        ended_retention: Duration::from_secs(60),
        ..MatchConfig::default()
    });
    let idle = service.create_match(create_request()).await.unwrap();
    let ended = service.create_match(create_request()).await.unwrap();
    service.forfeit(ended.match_id, ALICE).await.unwrap();

    tokio::time::sleep(Duration::from_secs(61)).await;
    let active = service.create_match(create_request()).await.unwrap();

    let purged = service.purge_idle().await;
    assert_eq!(purged, vec![ended.match_id]);
    assert_eq!(service.match_count().await, 2);

    tokio::time::sleep(Duration::from_secs(540)).await;
    let purged = service.purge_idle().await;
    assert_eq!(purged, vec![idle.match_id]);

    // Purging never touched the younger match.
    assert!(service.join(active.match_id, ALICE).await.is_ok());
    let err = service.join(idle.match_id, ALICE).await.unwrap_err();
    assert_eq!(error_code(&err), ErrorCode::MatchNotFound);
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_purges_periodically() {
    let (service, _outcomes) = service_with(MatchConfig {
        ended_retention: Duration::from_secs(10),
        sweep_interval: Duration::from_secs(15),
        ..MatchConfig::default()
    });
    let service = Arc::new(service);
    let snapshot = service.create_match(create_request()).await.unwrap();
    service.forfeit(snapshot.match_id, BOB).await.unwrap();

    let sweeper = service.spawn_sweeper();
    tokio::time::sleep(Duration::from_secs(16)).await;
    assert_eq!(service.match_count().await, 0);
    sweeper.abort();
}

#[tokio::test(start_paused = true)]
async fn test_sweeper_with_zero_interval_is_clamped() {
    let (service, _outcomes) = service_with(MatchConfig {
        ended_retention: Duration::from_secs(1),
        sweep_interval: Duration::ZERO,
        channel_size: 0,
        ..MatchConfig::default()
    });
    assert_eq!(service.config().sweep_interval, MatchConfig::MIN_SWEEP_INTERVAL);
    assert_eq!(service.config().channel_size, 1);

    let service = Arc::new(service);
    let snapshot = service.create_match(create_request()).await.unwrap();
    service.forfeit(snapshot.match_id, ALICE).await.unwrap();

    let sweeper = service.spawn_sweeper();
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(service.match_count().await, 0);
    sweeper.abort();
}

// =========================================================================
// Frames
// =========================================================================

#[tokio::test]
async fn test_frame_garbage_is_bad_payload() {
    let (service, _outcomes) = service();
    let reply = service
        .handle_frame(Some(ALICE), b"{not json")
        .await
        .unwrap();
    let reply: ServerReply = serde_json::from_slice(&reply).unwrap();
    assert_eq!(reply_code(&reply), ErrorCode::BadPayload);
}

#[tokio::test]
async fn test_frame_missing_field_is_bad_payload() {
    let (service, _outcomes) = service();
    let reply = frame(&service, Some(ALICE), json!({ "type": "Join", "match_id": 1 })).await;
    assert_eq!(reply_code(&reply), ErrorCode::BadPayload);
}

#[tokio::test]
async fn test_frame_without_caller_is_unauthenticated() {
    let (service, _outcomes) = service();
    let reply = frame(
        &service,
        None,
        json!({ "type": "Join", "match_id": 1, "participant_id": 11 }),
    )
    .await;
    assert_eq!(reply_code(&reply), ErrorCode::Unauthenticated);
}

#[tokio::test]
async fn test_frame_acting_for_other_player_is_unauthenticated() {
    let (service, _outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();
    let reply = frame(
        &service,
        Some(BOB),
        json!({ "type": "Forfeit", "match_id": snapshot.match_id, "participant_id": ALICE }),
    )
    .await;
    assert_eq!(reply_code(&reply), ErrorCode::Unauthenticated);
    assert!(!service.match_info(snapshot.match_id).await.unwrap().is_ended());
}

#[tokio::test]
async fn test_frame_join_by_non_participant_is_not_a_player() {
    let (service, _outcomes) = service();
    let snapshot = service.create_match(create_request()).await.unwrap();
    let reply = frame(
        &service,
        Some(PlayerId(77)),
        json!({ "type": "Join", "match_id": snapshot.match_id, "participant_id": 77 }),
    )
    .await;
    assert_eq!(reply_code(&reply), ErrorCode::NotAPlayer);
}

#[tokio::test]
async fn test_frame_full_flow() {
    let (service, _outcomes) = service();

    let created = frame(
        &service,
        Some(ALICE),
        json!({
            "type": "Create",
            "first_player_id": ALICE,
            "second_player_id": BOB,
            "blockers_enabled": true
        }),
    )
    .await;
    let ServerReply::Snapshot(snapshot) = created else {
        panic!("expected a snapshot, got {created:?}");
    };

    let step = opening_step(&snapshot, "f1");
    let request = ClientRequest::SubmitMove(step.clone());
    let reply = frame(&service, Some(step.participant_id), serde_json::to_value(&request).unwrap()).await;
    let ServerReply::MoveAccepted { snapshot: after, event } = reply else {
        panic!("expected MoveAccepted, got {reply:?}");
    };
    let event = event.unwrap();
    assert_eq!(event.from, step.from);
    assert_eq!(event.to, step.to);
    assert_eq!(after.turn, snapshot.turn.opponent());

    // The same player again is out of turn.
    let mut again = step.clone();
    again.move_id = MoveId::from("f2");
    again.from = step.to;
    again.to = Coord::new(step.to.row + (step.to.row - step.from.row), step.to.col);
    let reply = frame(
        &service,
        Some(step.participant_id),
        serde_json::to_value(ClientRequest::SubmitMove(again)).unwrap(),
    )
    .await;
    assert_eq!(reply_code(&reply), ErrorCode::NotYourTurn);

    let join = ClientRequest::Join(JoinMatch {
        match_id: snapshot.match_id,
        participant_id: BOB,
    });
    let reply = frame(&service, Some(BOB), serde_json::to_value(join).unwrap()).await;
    assert_eq!(reply, ServerReply::Snapshot(after));
}

#[tokio::test]
async fn test_frame_error_reply_wire_shape() {
    let (service, _outcomes) = service();
    let bytes = service.handle_frame(None, b"{}").await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["type"], "Error");
    assert_eq!(value["error_code"], "UNAUTHENTICATED");
    assert!(value["message"].is_string());
}
