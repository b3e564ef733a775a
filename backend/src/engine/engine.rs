//! Queue engine implementation
//!
//! Owns the queue aggregate for one clinic-day and exposes the transition
//! operations: enqueue, call-next, complete, hold, recall, move-to-front.
//! The same engine backs the reception console and the doctor console; the
//! call-next/hold/recall logic lives here once instead of being duplicated
//! per surface.
//!
//! # Contract
//!
//! - Each operation runs to completion before any other operation observes
//!   state (single writer, no suspension points).
//! - Every successful mutation publishes the full resulting snapshot to the
//!   shared store before returning, so polling surfaces converge.
//! - A failed publish leaves the in-memory aggregate at its pre-operation
//!   value and surfaces the store error: fail fast, leave state consistent.
//! - Caller errors (unknown token id, no current token) reject the
//!   operation without touching state.

use crate::core::time::Clock;
use crate::models::patient::{PatientDirectory, PatientRef};
use crate::models::queue::QueueState;
use crate::models::token::{Token, TokenError};
use crate::policy::dispatch::{next_waiting, promote_to_front};
use crate::store::shared::SnapshotStore;
use crate::store::snapshot::{validate_snapshot, QueueSnapshot};
use crate::store::SnapshotError;
use thiserror::Error;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// First token number handed out on an empty day
    pub number_seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { number_seed: 1 }
    }
}

/// Result of a mutating operation: a human-readable outcome for the UI
/// toast/banner plus the snapshot the operation published.
#[derive(Debug, Clone)]
pub struct OpOutcome {
    /// Short outcome message, e.g. "Token #17 called"
    pub message: String,

    /// Full queue snapshot after the operation
    pub snapshot: QueueSnapshot,
}

/// Queue operation errors
///
/// Empty-queue `call_next` is NOT in this enum: it is a normal outcome,
/// reported through [`OpOutcome`].
#[derive(Debug, Error)]
pub enum QueueError {
    /// Patient id not known to the directory at enqueue time
    #[error("Unknown patient: {0}")]
    UnknownPatient(String),

    /// `complete_current`/`hold_current` with an empty chair
    #[error("No patient is currently being seen")]
    NoCurrentToken,

    /// `call_next` while a consultation is still running
    #[error("Token #{0} is still being seen; complete or hold it first")]
    ConsultationInProgress(u32),

    /// Token id not found in the waiting line
    #[error("Token {0} is not in the waiting line")]
    TokenNotWaiting(String),

    /// Token id not found in the hold set
    #[error("Token {0} is not on hold")]
    TokenNotOnHold(String),

    /// Guarded token transition rejected (internal misuse)
    #[error(transparent)]
    Transition(#[from] TokenError),

    /// Snapshot store read/write failure; state left at last-known-good
    #[error(transparent)]
    Store(#[from] SnapshotError),
}

/// The queue engine for one clinic-day
///
/// # Example
///
/// ```
/// use clinic_queue_core_rs::{
///     EngineConfig, ManualClock, PatientRef, QueueEngine, SharedStore,
/// };
///
/// let mut engine = QueueEngine::new(
///     EngineConfig::default(),
///     SharedStore::new(),
///     ManualClock::new(0),
/// );
///
/// engine
///     .enqueue(PatientRef::new("p-001", "Asha Rao"), false)
///     .unwrap();
/// let outcome = engine.call_next().unwrap();
/// assert_eq!(outcome.message, "Token #1 called for Asha Rao");
/// ```
#[derive(Debug)]
pub struct QueueEngine<S: SnapshotStore, C: Clock> {
    config: EngineConfig,
    state: QueueState,
    store: S,
    clock: C,
}

impl<S: SnapshotStore, C: Clock> QueueEngine<S, C> {
    /// Create an engine over an empty queue
    pub fn new(config: EngineConfig, store: S, clock: C) -> Self {
        Self {
            config,
            state: QueueState::new(),
            store,
            clock,
        }
    }

    /// Current in-memory queue state
    pub fn state(&self) -> &QueueState {
        &self.state
    }

    /// Snapshot of the current in-memory state
    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot::from(&self.state)
    }

    /// Backing store handle
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable clock access (tests advance a `ManualClock` through this)
    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Replace local state wholesale from the shared store
    ///
    /// Used by a console that may have gone stale (another surface wrote in
    /// the meantime). A store with no snapshot yet leaves the local state
    /// untouched. The loaded snapshot is validated before being adopted.
    pub fn hydrate(&mut self) -> Result<QueueSnapshot, QueueError> {
        if let Some(snapshot) = self.store.load()? {
            validate_snapshot(&snapshot)?;
            self.state = QueueState::from(snapshot);
        }
        Ok(self.snapshot())
    }

    /// Issue a token for a patient already resolved to a [`PatientRef`]
    ///
    /// The token always starts in the waiting line, at the back; there is
    /// no auto-promotion into the chair even when the clinic is idle.
    pub fn enqueue(
        &mut self,
        patient: PatientRef,
        is_emergency: bool,
    ) -> Result<OpOutcome, QueueError> {
        let mut next = self.state.clone();
        let number = next.next_number(self.config.number_seed);
        let token = Token::new(number, patient, is_emergency);

        let message = if is_emergency {
            format!(
                "Emergency token #{} issued for {}",
                number,
                token.patient().name
            )
        } else {
            format!("Token #{} issued for {}", number, token.patient().name)
        };

        next.push_waiting(token);
        self.commit(next, message)
    }

    /// Issue a token by looking the patient up in the directory
    pub fn enqueue_patient(
        &mut self,
        directory: &dyn PatientDirectory,
        patient_id: &str,
        is_emergency: bool,
    ) -> Result<OpOutcome, QueueError> {
        let patient = directory
            .lookup(patient_id)
            .ok_or_else(|| QueueError::UnknownPatient(patient_id.to_string()))?;
        self.enqueue(patient, is_emergency)
    }

    /// Call the next patient into the chair
    ///
    /// Dispatch order: emergency tokens in arrival order, then the rest in
    /// arrival order. An empty waiting line is a normal outcome, not an
    /// error, and repeating the call changes nothing.
    pub fn call_next(&mut self) -> Result<OpOutcome, QueueError> {
        if let Some(current) = self.state.current() {
            return Err(QueueError::ConsultationInProgress(current.number()));
        }

        let index = match next_waiting(self.state.waiting()) {
            Some(index) => index,
            None => {
                return Ok(OpOutcome {
                    message: "No patients waiting".to_string(),
                    snapshot: self.snapshot(),
                });
            }
        };

        let mut next = self.state.clone();
        let mut token = next.remove_waiting(index);
        token.mark_current()?;
        let message = format!("Token #{} called for {}", token.number(), token.patient().name);
        next.set_current(token)
            .map_err(|rejected| QueueError::ConsultationInProgress(rejected.number()))?;

        self.commit(next, message)
    }

    /// Finish the current consultation
    pub fn complete_current(&mut self) -> Result<OpOutcome, QueueError> {
        let mut next = self.state.clone();
        let mut token = next.take_current().ok_or(QueueError::NoCurrentToken)?;

        let now = self.clock.now_millis();
        token.mark_completed(now)?;
        let message = format!("Token #{} completed", token.number());
        next.push_completed(token);

        self.commit(next, message)
    }

    /// Park the current patient on hold (e.g. sent for a lab report)
    pub fn hold_current(&mut self) -> Result<OpOutcome, QueueError> {
        let mut next = self.state.clone();
        let mut token = next.take_current().ok_or(QueueError::NoCurrentToken)?;

        let now = self.clock.now_millis();
        token.mark_hold(now)?;
        let message = format!("Token #{} placed on hold", token.number());
        next.push_on_hold(token);

        self.commit(next, message)
    }

    /// Park a still-waiting patient on hold without calling them first
    pub fn hold_waiting(&mut self, token_id: &str) -> Result<OpOutcome, QueueError> {
        let index = self
            .state
            .waiting_position(token_id)
            .ok_or_else(|| QueueError::TokenNotWaiting(token_id.to_string()))?;

        let mut next = self.state.clone();
        let mut token = next.remove_waiting(index);

        let now = self.clock.now_millis();
        token.mark_hold(now)?;
        let message = format!("Token #{} placed on hold", token.number());
        next.push_on_hold(token);

        self.commit(next, message)
    }

    /// Return a held patient to the back of the waiting line
    pub fn recall(&mut self, token_id: &str) -> Result<OpOutcome, QueueError> {
        let mut next = self.state.clone();
        let mut token = next
            .take_on_hold(token_id)
            .ok_or_else(|| QueueError::TokenNotOnHold(token_id.to_string()))?;

        token.mark_waiting()?;
        let message = format!("Token #{} recalled to the waiting line", token.number());
        next.push_waiting(token);

        self.commit(next, message)
    }

    /// Move a waiting patient to the front of the non-emergency segment
    ///
    /// Re-prioritizes without breaking emergency-first: the token lands
    /// immediately after the last emergency token and ahead of every other
    /// non-emergency token. Status is unchanged.
    pub fn move_to_front(&mut self, token_id: &str) -> Result<OpOutcome, QueueError> {
        let index = self
            .state
            .waiting_position(token_id)
            .ok_or_else(|| QueueError::TokenNotWaiting(token_id.to_string()))?;

        let mut next = self.state.clone();
        let waiting = next.take_waiting();
        let number = waiting[index].number();
        next.replace_waiting(promote_to_front(waiting, index));

        let message = format!("Token #{} moved up", number);
        self.commit(next, message)
    }

    /// Publish `next` to the store, then commit it locally.
    ///
    /// Commit order is deliberate: a store failure aborts before the local
    /// aggregate changes, so the engine keeps its last-known-good state.
    fn commit(&mut self, next: QueueState, message: String) -> Result<OpOutcome, QueueError> {
        let snapshot = QueueSnapshot::from(&next);
        self.store.save(&snapshot)?;
        self.state = next;
        Ok(OpOutcome { message, snapshot })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::ManualClock;
    use crate::models::token::TokenStatus;
    use crate::store::shared::SharedStore;

    fn engine() -> QueueEngine<SharedStore, ManualClock> {
        QueueEngine::new(
            EngineConfig::default(),
            SharedStore::new(),
            ManualClock::new(1_000),
        )
    }

    fn patient(n: u32) -> PatientRef {
        PatientRef::new(format!("p-{}", n), format!("Patient {}", n))
    }

    #[test]
    fn test_enqueue_assigns_sequential_numbers() {
        let mut engine = engine();
        engine.enqueue(patient(1), false).unwrap();
        engine.enqueue(patient(2), true).unwrap();

        let numbers: Vec<u32> = engine.state().waiting().iter().map(|t| t.number()).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_number_seed_applies_to_empty_day() {
        let mut engine = QueueEngine::new(
            EngineConfig { number_seed: 100 },
            SharedStore::new(),
            ManualClock::new(0),
        );

        let outcome = engine.enqueue(patient(1), false).unwrap();
        assert_eq!(outcome.message, "Token #100 issued for Patient 1");
    }

    #[test]
    fn test_numbers_survive_completion() {
        let mut engine = engine();
        engine.enqueue(patient(1), false).unwrap();
        engine.call_next().unwrap();
        engine.complete_current().unwrap();

        // The completed token still reserves number 1
        let outcome = engine.enqueue(patient(2), false).unwrap();
        assert_eq!(outcome.message, "Token #2 issued for Patient 2");
    }

    #[test]
    fn test_call_next_rejected_while_consulting() {
        let mut engine = engine();
        engine.enqueue(patient(1), false).unwrap();
        engine.enqueue(patient(2), false).unwrap();
        engine.call_next().unwrap();

        let err = engine.call_next().unwrap_err();
        assert!(matches!(err, QueueError::ConsultationInProgress(1)));
        // State untouched by the rejected call
        assert_eq!(engine.state().waiting().len(), 1);
    }

    #[test]
    fn test_complete_without_current_is_rejected() {
        let mut engine = engine();
        assert!(matches!(
            engine.complete_current().unwrap_err(),
            QueueError::NoCurrentToken
        ));
        assert!(matches!(
            engine.hold_current().unwrap_err(),
            QueueError::NoCurrentToken
        ));
    }

    #[test]
    fn test_unknown_token_ids_are_rejected() {
        let mut engine = engine();
        engine.enqueue(patient(1), false).unwrap();

        assert!(matches!(
            engine.hold_waiting("no-such-id").unwrap_err(),
            QueueError::TokenNotWaiting(_)
        ));
        assert!(matches!(
            engine.recall("no-such-id").unwrap_err(),
            QueueError::TokenNotOnHold(_)
        ));
        assert!(matches!(
            engine.move_to_front("no-such-id").unwrap_err(),
            QueueError::TokenNotWaiting(_)
        ));
        assert_eq!(engine.state().total_tokens(), 1);
    }

    #[test]
    fn test_enqueue_patient_uses_directory() {
        use crate::models::patient::StaticDirectory;

        let dir = StaticDirectory::new(vec![PatientRef::new("p-7", "Walk In")]);
        let mut engine = engine();

        let outcome = engine.enqueue_patient(&dir, "p-7", false).unwrap();
        assert_eq!(outcome.message, "Token #1 issued for Walk In");

        assert!(matches!(
            engine.enqueue_patient(&dir, "p-8", false).unwrap_err(),
            QueueError::UnknownPatient(_)
        ));
    }

    #[test]
    fn test_hold_timestamps_come_from_clock() {
        let mut engine = engine();
        engine.enqueue(patient(1), false).unwrap();
        let id = engine.state().waiting()[0].id().to_string();

        engine.hold_waiting(&id).unwrap();
        assert_eq!(engine.state().on_hold()[0].hold_at(), Some(1_000));
        assert_eq!(engine.state().on_hold()[0].status(), TokenStatus::Hold);
    }

    #[test]
    fn test_every_mutation_publishes_to_the_store() {
        let mut engine = engine();
        let store = engine.store().clone();

        engine.enqueue(patient(1), false).unwrap();
        assert_eq!(store.revision().unwrap(), 1);

        engine.call_next().unwrap();
        assert_eq!(store.revision().unwrap(), 2);

        engine.complete_current().unwrap();
        assert_eq!(store.revision().unwrap(), 3);

        let persisted = store.load().unwrap().unwrap();
        assert_eq!(persisted, engine.snapshot());
    }

    #[test]
    fn test_empty_call_next_does_not_publish() {
        let mut engine = engine();
        let store = engine.store().clone();

        let outcome = engine.call_next().unwrap();
        assert_eq!(outcome.message, "No patients waiting");
        assert_eq!(store.revision().unwrap(), 0);
    }

    #[test]
    fn test_hydrate_adopts_persisted_snapshot() {
        let store = SharedStore::new();
        let mut writer = QueueEngine::new(
            EngineConfig::default(),
            store.clone(),
            ManualClock::new(0),
        );
        writer.enqueue(patient(1), true).unwrap();

        let mut reader =
            QueueEngine::new(EngineConfig::default(), store, ManualClock::new(0));
        reader.hydrate().unwrap();

        assert_eq!(reader.state(), writer.state());
    }

    #[test]
    fn test_hydrate_on_empty_store_is_a_noop() {
        let mut engine = engine();
        engine.enqueue(patient(1), false).unwrap();

        // The engine's own store has a snapshot; a brand new store does not
        let mut fresh = QueueEngine::new(
            EngineConfig::default(),
            SharedStore::new(),
            ManualClock::new(0),
        );
        fresh.hydrate().unwrap();
        assert_eq!(fresh.state().total_tokens(), 0);
    }
}
