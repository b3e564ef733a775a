//! Tests for the token lifecycle
//!
//! Covers the per-token state machine and the historical timestamp rules:
//! - A token starts Waiting and ends Completed, never skipping Current
//!   except through an explicit waiting-line hold
//! - `hold_at` is refreshed on every entry into Hold
//! - `completed_at` is stamped once

use clinic_queue_core_rs::{
    EngineConfig, ManualClock, PatientRef, QueueEngine, SharedStore, Token, TokenStatus,
};

fn engine_at(millis: u64) -> QueueEngine<SharedStore, ManualClock> {
    QueueEngine::new(
        EngineConfig::default(),
        SharedStore::new(),
        ManualClock::new(millis),
    )
}

fn patient(name: &str) -> PatientRef {
    PatientRef::new(name.to_lowercase(), name)
}

#[test]
fn test_token_identity_is_immutable_across_moves() {
    let mut engine = engine_at(0);
    engine.enqueue(patient("Asha"), true).unwrap();

    let issued = engine.state().waiting()[0].clone();
    engine.call_next().unwrap();
    engine.hold_current().unwrap();

    let held = &engine.state().on_hold()[0];
    assert_eq!(held.id(), issued.id());
    assert_eq!(held.number(), issued.number());
    assert_eq!(held.patient(), issued.patient());
    assert!(held.is_emergency());
}

#[test]
fn test_waiting_token_never_passes_through_current_on_hold() {
    let mut engine = engine_at(500);
    engine.enqueue(patient("Dev"), false).unwrap();
    let id = engine.state().waiting()[0].id().to_string();

    engine.hold_waiting(&id).unwrap();

    let held = &engine.state().on_hold()[0];
    assert_eq!(held.status(), TokenStatus::Hold);
    assert_eq!(held.hold_at(), Some(500));
    assert!(engine.state().current().is_none());
}

#[test]
fn test_rehold_refreshes_hold_timestamp() {
    let mut engine = engine_at(100);
    engine.enqueue(patient("Dev"), false).unwrap();
    let id = engine.state().waiting()[0].id().to_string();

    engine.hold_waiting(&id).unwrap();
    assert_eq!(engine.state().on_hold()[0].hold_at(), Some(100));

    engine.recall(&id).unwrap();
    // Hold history survives the recall
    assert_eq!(engine.state().waiting()[0].hold_at(), Some(100));

    engine.clock_mut().advance(8_900);
    engine.hold_waiting(&id).unwrap();
    assert_eq!(engine.state().on_hold()[0].hold_at(), Some(9_000));
}

#[test]
fn test_completed_at_is_stamped_once() {
    let mut engine = engine_at(2_000);
    engine.enqueue(patient("Dev"), false).unwrap();
    engine.call_next().unwrap();
    engine.complete_current().unwrap();

    let done = &engine.state().completed()[0];
    assert_eq!(done.status(), TokenStatus::Completed);
    assert_eq!(done.completed_at(), Some(2_000));
    assert_eq!(done.hold_at(), None);
}

#[test]
fn test_from_snapshot_preserves_everything() {
    let restored = Token::from_snapshot(
        "id-x".to_string(),
        17,
        PatientRef::new("p-17", "Asha Rao"),
        true,
        TokenStatus::Hold,
        Some(1_234),
        None,
    );

    assert_eq!(restored.id(), "id-x");
    assert_eq!(restored.number(), 17);
    assert!(restored.is_emergency());
    assert_eq!(restored.status(), TokenStatus::Hold);
    assert_eq!(restored.hold_at(), Some(1_234));
    assert_eq!(restored.completed_at(), None);
}
