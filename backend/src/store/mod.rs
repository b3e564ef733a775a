//! Snapshot persistence
//!
//! The queue aggregate is persisted as one whole serialized blob, the way
//! the clinic UI keeps it in browser-local storage: every write replaces
//! the entire snapshot, every read takes the entire snapshot. Partial
//! updates and merges do not exist at this boundary.

pub mod shared;
pub mod snapshot;

pub use shared::{SharedStore, SnapshotStore};
pub use snapshot::{compute_snapshot_digest, validate_snapshot, QueueSnapshot, TokenSnapshot};

use thiserror::Error;

/// Errors at the snapshot persistence boundary
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot serialization failed: {0}")]
    Serialization(String),

    #[error("Stored snapshot is corrupt: {0}")]
    Corrupt(String),

    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),

    #[error("Snapshot validation failed: {0}")]
    Validation(String),
}
