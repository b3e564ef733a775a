//! Domain models for the clinic token queue

pub mod patient;
pub mod queue;
pub mod token;

// Re-exports
pub use patient::{PatientDirectory, PatientRef, StaticDirectory};
pub use queue::QueueState;
pub use token::{Token, TokenError, TokenStatus};
