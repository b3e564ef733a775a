//! Shared snapshot store
//!
//! Stand-in for the browser-local key-value blob the clinic UI surfaces
//! share: one serialized snapshot, replaced wholesale on every write. A
//! cloned [`SharedStore`] is another handle onto the same blob, the way
//! each open page holds the same local-storage key. There is no locking
//! across writers; two racing consoles resolve as last-writer-wins.
//!
//! The revision counter is the change-notification channel: observers poll
//! it cheaply and re-read the blob only when it moved.

use crate::store::snapshot::{compute_snapshot_digest, QueueSnapshot};
use crate::store::SnapshotError;
use std::sync::{Arc, Mutex};

/// Persistence boundary for the queue aggregate.
///
/// `save` replaces the persisted snapshot atomically and returns the new
/// revision; `load` returns the whole snapshot (never a partial view);
/// `revision` is a cheap poll for "did anything change".
pub trait SnapshotStore {
    /// Replace the persisted snapshot wholesale
    fn save(&self, snapshot: &QueueSnapshot) -> Result<u64, SnapshotError>;

    /// Read the full persisted snapshot, or `None` if nothing saved yet
    fn load(&self) -> Result<Option<QueueSnapshot>, SnapshotError>;

    /// Current revision counter (bumped on every save)
    fn revision(&self) -> Result<u64, SnapshotError>;
}

#[derive(Debug, Default)]
struct Inner {
    /// JSON serialization of the full snapshot, `None` before first save
    blob: Option<String>,

    /// SHA256 digest of the snapshot, checked on every load
    digest: Option<String>,

    /// Bumped on every save; observers poll this
    revision: u64,
}

/// In-memory shared blob store.
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{QueueSnapshot, SharedStore, SnapshotStore};
///
/// let store = SharedStore::new();
/// let reception = store.clone(); // same blob, second surface
///
/// store.save(&QueueSnapshot::empty()).unwrap();
/// assert_eq!(reception.revision().unwrap(), 1);
/// assert!(reception.load().unwrap().is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<Inner>>,
}

impl SharedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, SnapshotError> {
        self.inner
            .lock()
            .map_err(|_| SnapshotError::Unavailable("store lock poisoned".to_string()))
    }
}

impl SnapshotStore for SharedStore {
    fn save(&self, snapshot: &QueueSnapshot) -> Result<u64, SnapshotError> {
        let blob = serde_json::to_string(snapshot)
            .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
        let digest = compute_snapshot_digest(snapshot)?;

        let mut inner = self.lock()?;
        inner.blob = Some(blob);
        inner.digest = Some(digest);
        inner.revision += 1;
        Ok(inner.revision)
    }

    fn load(&self) -> Result<Option<QueueSnapshot>, SnapshotError> {
        let inner = self.lock()?;
        let blob = match &inner.blob {
            Some(blob) => blob,
            None => return Ok(None),
        };

        let snapshot: QueueSnapshot = serde_json::from_str(blob)
            .map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        let digest = compute_snapshot_digest(&snapshot)?;
        if inner.digest.as_deref() != Some(digest.as_str()) {
            return Err(SnapshotError::Corrupt(
                "snapshot digest mismatch".to_string(),
            ));
        }

        Ok(Some(snapshot))
    }

    fn revision(&self) -> Result<u64, SnapshotError> {
        Ok(self.lock()?.revision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::PatientRef;
    use crate::models::token::TokenStatus;
    use crate::store::snapshot::TokenSnapshot;

    fn one_token_snapshot() -> QueueSnapshot {
        let mut snapshot = QueueSnapshot::empty();
        snapshot.waiting.push(TokenSnapshot {
            id: "id-1".to_string(),
            number: 1,
            patient: PatientRef::new("p-1", "Asha Rao"),
            is_emergency: false,
            status: TokenStatus::Waiting,
            hold_at: None,
            completed_at: None,
        });
        snapshot
    }

    #[test]
    fn test_load_before_first_save_is_none() {
        let store = SharedStore::new();
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.revision().unwrap(), 0);
    }

    #[test]
    fn test_save_bumps_revision_and_round_trips() {
        let store = SharedStore::new();
        let snapshot = one_token_snapshot();

        assert_eq!(store.save(&snapshot).unwrap(), 1);
        assert_eq!(store.save(&snapshot).unwrap(), 2);
        assert_eq!(store.load().unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_clone_shares_the_blob() {
        let store = SharedStore::new();
        let other_surface = store.clone();

        store.save(&one_token_snapshot()).unwrap();
        assert_eq!(other_surface.revision().unwrap(), 1);
        assert_eq!(
            other_surface.load().unwrap().unwrap(),
            one_token_snapshot()
        );
    }

    #[test]
    fn test_tampered_blob_is_reported_corrupt() {
        let store = SharedStore::new();
        store.save(&one_token_snapshot()).unwrap();

        {
            let mut inner = store.inner.lock().unwrap();
            let tampered = inner.blob.as_ref().unwrap().replace("Asha Rao", "Nobody");
            inner.blob = Some(tampered);
        }

        match store.load() {
            Err(SnapshotError::Corrupt(_)) => {}
            other => panic!("expected Corrupt error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_unparseable_blob_is_reported_corrupt() {
        let store = SharedStore::new();
        store.save(&one_token_snapshot()).unwrap();

        {
            let mut inner = store.inner.lock().unwrap();
            inner.blob = Some("{not json".to_string());
        }

        assert!(matches!(store.load(), Err(SnapshotError::Corrupt(_))));
    }
}
