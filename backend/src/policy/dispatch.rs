//! Emergency-first dispatch ordering
//!
//! # Behavior
//!
//! - `dispatch_order`: the effective call order — all emergency tokens in
//!   arrival order, then all non-emergency tokens in arrival order
//! - `next_waiting`: the token `call_next` would pick (head of the above)
//! - `promote_to_front`: staff re-prioritization — the chosen token moves
//!   to the front of the non-emergency segment, never ahead of emergencies
//!
//! All functions are pure over the stored waiting line and return indices
//! or permutations; they never touch token status.

use crate::models::token::Token;

/// Effective dispatch order of the waiting line, as indices into it.
///
/// Stable within each class: two emergencies (or two non-emergencies) keep
/// their relative arrival order.
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{dispatch_order, PatientRef, Token};
///
/// let waiting = vec![
///     Token::new(1, PatientRef::new("a", "A"), false),
///     Token::new(2, PatientRef::new("b", "B"), true),
///     Token::new(3, PatientRef::new("c", "C"), false),
/// ];
/// assert_eq!(dispatch_order(&waiting), vec![1, 0, 2]);
/// ```
pub fn dispatch_order(waiting: &[Token]) -> Vec<usize> {
    dispatch_order_by(waiting, Token::is_emergency)
}

/// `dispatch_order` over any token-shaped slice (e.g. snapshot tokens)
pub fn dispatch_order_by<T>(items: &[T], is_emergency: impl Fn(&T) -> bool) -> Vec<usize> {
    let emergencies = (0..items.len()).filter(|&i| is_emergency(&items[i]));
    let routine = (0..items.len()).filter(|&i| !is_emergency(&items[i]));
    emergencies.chain(routine).collect()
}

/// Index of the token `call_next` should promote, or `None` if nobody waits
pub fn next_waiting(waiting: &[Token]) -> Option<usize> {
    dispatch_order(waiting).into_iter().next()
}

/// Insertion index for a re-prioritized token: just past the emergencies.
///
/// With the line normalized emergency-first, this is the front of the
/// non-emergency segment.
pub fn reprioritized_position(waiting: &[Token]) -> usize {
    waiting.iter().filter(|t| t.is_emergency()).count()
}

/// Move the token at `index` to the front of the non-emergency segment.
///
/// The whole line is normalized into dispatch order with the chosen token
/// placed immediately after the last emergency, so it is called before
/// every previously-earlier non-emergency token but never before an
/// emergency. Statuses are untouched.
///
/// # Panics
/// Panics if `index` is out of bounds (callers resolve ids first).
pub fn promote_to_front(mut waiting: Vec<Token>, index: usize) -> Vec<Token> {
    let chosen = waiting.remove(index);
    let order = dispatch_order(&waiting);
    let mut reordered: Vec<Token> = Vec::with_capacity(waiting.len() + 1);
    // Consume in dispatch order without cloning
    let mut slots: Vec<Option<Token>> = waiting.into_iter().map(Some).collect();
    for i in order {
        if let Some(token) = slots[i].take() {
            reordered.push(token);
        }
    }
    let at = reprioritized_position(&reordered);
    reordered.insert(at, chosen);
    reordered
}
