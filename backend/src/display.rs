//! Display surface - read-only queue observer
//!
//! The waiting-room screen (and any other read-only surface) never mutates
//! tokens. It polls the shared store's revision counter on its refresh
//! interval and, when the revision moved, replaces its cached view with
//! the freshly loaded snapshot wholesale. Partial merges do not exist:
//! either the whole previous view or the whole new one is visible.

use crate::policy::dispatch::dispatch_order_by;
use crate::store::shared::SnapshotStore;
use crate::store::snapshot::{validate_snapshot, QueueSnapshot, TokenSnapshot};
use crate::store::SnapshotError;

/// Read-only view over the shared queue snapshot.
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{
///     DisplayBoard, EngineConfig, ManualClock, PatientRef, QueueEngine, SharedStore,
/// };
///
/// let store = SharedStore::new();
/// let mut engine = QueueEngine::new(
///     EngineConfig::default(),
///     store.clone(),
///     ManualClock::new(0),
/// );
/// let mut board = DisplayBoard::new(store);
///
/// engine.enqueue(PatientRef::new("p-1", "Asha Rao"), false).unwrap();
/// assert!(board.refresh().unwrap());
/// assert_eq!(board.view().waiting.len(), 1);
/// assert!(!board.refresh().unwrap()); // nothing changed since
/// ```
#[derive(Debug)]
pub struct DisplayBoard<S: SnapshotStore> {
    store: S,
    view: QueueSnapshot,
    last_revision: u64,
}

impl<S: SnapshotStore> DisplayBoard<S> {
    /// Create a board with an empty view; call [`DisplayBoard::refresh`]
    /// to pick up the current snapshot.
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: QueueSnapshot::empty(),
            last_revision: 0,
        }
    }

    /// Re-read the store if its revision moved since the last refresh.
    ///
    /// Returns `true` when the view was replaced. A store that has never
    /// been written to leaves the empty view in place.
    pub fn refresh(&mut self) -> Result<bool, SnapshotError> {
        let revision = self.store.revision()?;
        if revision == self.last_revision {
            return Ok(false);
        }

        if let Some(snapshot) = self.store.load()? {
            validate_snapshot(&snapshot)?;
            self.view = snapshot;
        }
        self.last_revision = revision;
        Ok(true)
    }

    /// The cached snapshot as of the last successful refresh
    pub fn view(&self) -> &QueueSnapshot {
        &self.view
    }

    /// Token currently with the doctor, if any
    pub fn current(&self) -> Option<&TokenSnapshot> {
        self.view.current.as_ref()
    }

    /// Waiting tokens in dispatch order (emergencies first) for presentation
    pub fn sorted_waiting(&self) -> Vec<&TokenSnapshot> {
        dispatch_order_by(&self.view.waiting, |t| t.is_emergency)
            .into_iter()
            .map(|i| &self.view.waiting[i])
            .collect()
    }
}
