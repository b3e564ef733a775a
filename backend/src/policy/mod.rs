//! Dispatch ordering policy
//!
//! The waiting line is stored in arrival order; the order patients are
//! actually called in is derived at dispatch time (emergency tokens first,
//! arrival order within each class). Keeping the policy as standalone pure
//! functions makes the emergency-first invariant independently testable
//! instead of being buried in index arithmetic at each call site.

pub mod dispatch;

pub use dispatch::{
    dispatch_order, dispatch_order_by, next_waiting, promote_to_front, reprioritized_position,
};
