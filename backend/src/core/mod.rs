//! Core utilities: clock abstraction

pub mod time;

pub use time::{Clock, ManualClock, MonotonicClock};
