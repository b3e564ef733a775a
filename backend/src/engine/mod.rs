//! Queue engine - the only sanctioned mutators of the queue aggregate
//!
//! Every UI surface (reception console, doctor console) drives the queue
//! through this module; the display surface observes through `display`.
//!
//! See `engine.rs` for the full implementation.

pub mod engine;

// Re-export main types for convenience
pub use engine::{EngineConfig, OpOutcome, QueueEngine, QueueError};
