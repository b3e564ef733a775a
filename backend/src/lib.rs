//! Clinic Queue Core - Rust Engine
//!
//! Walk-in token queue engine for a clinic front desk: token lifecycle,
//! emergency-first dispatch ordering, and whole-snapshot publication to a
//! shared store polled by the reception, doctor, and display surfaces.
//!
//! # Architecture
//!
//! - **core**: Clock abstraction (monotonic timestamps)
//! - **models**: Domain types (PatientRef, Token, QueueState)
//! - **policy**: Dispatch ordering (emergency-first selection and placement)
//! - **engine**: The only sanctioned mutators of the queue aggregate
//! - **store**: Snapshot serialization, digests, and the shared blob store
//! - **display**: Read-only observer surface with revision-gated refresh
//!
//! # Critical Invariants
//!
//! 1. At most one token is `Current` at any time
//! 2. Token numbers are unique for the clinic-day
//! 3. Dispatch always visits emergency tokens before non-emergency ones
//! 4. A token lives in exactly one of current/waiting/on-hold/completed
//! 5. Observers never see a half-applied operation (whole-snapshot replace)

// Module declarations
pub mod core;
pub mod display;
pub mod engine;
pub mod models;
pub mod policy;
pub mod store;

// Re-exports for convenience
pub use crate::core::time::{Clock, ManualClock, MonotonicClock};
pub use display::DisplayBoard;
pub use engine::{EngineConfig, OpOutcome, QueueEngine, QueueError};
pub use models::{
    patient::{PatientDirectory, PatientRef, StaticDirectory},
    queue::QueueState,
    token::{Token, TokenError, TokenStatus},
};
pub use policy::dispatch::{dispatch_order, next_waiting, reprioritized_position};
pub use store::{
    shared::{SharedStore, SnapshotStore},
    snapshot::{compute_snapshot_digest, validate_snapshot, QueueSnapshot, TokenSnapshot},
    SnapshotError,
};
