//! Queue aggregate
//!
//! Holds the complete queue for one clinic-day: the single current token,
//! the waiting line (storage order = arrival order), the hold set, and the
//! completed history (most-recent-first).
//!
//! # Critical Invariants
//!
//! 1. **Single current**: at most one token is `Current`
//! 2. **Number uniqueness**: no two tokens share a number within the day
//! 3. **Exclusive membership**: a token lives in exactly one of the four sets
//! 4. **No loss**: tokens are never deleted, only moved between sets
//!
//! The aggregate exposes membership moves as plain data operations; the
//! status transitions and dispatch policy live in `models::token` and
//! `policy::dispatch`, orchestrated by the engine.

use crate::models::token::Token;

/// Complete queue state for one clinic-day
///
/// # Example
///
/// ```
/// use clinic_queue_core_rs::{PatientRef, QueueState, Token};
///
/// let mut queue = QueueState::new();
/// queue.push_waiting(Token::new(1, PatientRef::new("p-1", "Asha Rao"), false));
/// assert_eq!(queue.waiting().len(), 1);
/// assert_eq!(queue.next_number(1), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueState {
    /// Token with the doctor right now, if any
    current: Option<Token>,

    /// Waiting line in arrival order (dispatch order is derived, not stored)
    waiting: Vec<Token>,

    /// Held tokens in insertion order (display only, not dispatched)
    on_hold: Vec<Token>,

    /// Completed tokens, most-recent-first
    completed: Vec<Token>,
}

impl QueueState {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from its four membership sets (snapshot restore)
    pub fn from_parts(
        current: Option<Token>,
        waiting: Vec<Token>,
        on_hold: Vec<Token>,
        completed: Vec<Token>,
    ) -> Self {
        Self {
            current,
            waiting,
            on_hold,
            completed,
        }
    }

    /// Token currently with the doctor
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    /// Waiting line in arrival order
    pub fn waiting(&self) -> &[Token] {
        &self.waiting
    }

    /// Held tokens in insertion order
    pub fn on_hold(&self) -> &[Token] {
        &self.on_hold
    }

    /// Completed tokens, most recent first
    pub fn completed(&self) -> &[Token] {
        &self.completed
    }

    /// Total number of tokens across all four sets
    pub fn total_tokens(&self) -> usize {
        self.current.iter().count()
            + self.waiting.len()
            + self.on_hold.len()
            + self.completed.len()
    }

    /// Next token number: `max(existing) + 1`, or `seed` when the day is empty
    ///
    /// Scans all four sets so completed and held tokens keep their numbers
    /// reserved for the rest of the day.
    pub fn next_number(&self, seed: u32) -> u32 {
        self.all_tokens()
            .map(Token::number)
            .max()
            .map(|max| max + 1)
            .unwrap_or(seed)
    }

    /// Iterate over every token in the aggregate
    pub fn all_tokens(&self) -> impl Iterator<Item = &Token> {
        self.current
            .iter()
            .chain(self.waiting.iter())
            .chain(self.on_hold.iter())
            .chain(self.completed.iter())
    }

    /// Append a freshly issued token to the back of the waiting line
    pub fn push_waiting(&mut self, token: Token) {
        self.waiting.push(token);
    }

    /// Position of a waiting token by id
    pub fn waiting_position(&self, token_id: &str) -> Option<usize> {
        self.waiting.iter().position(|t| t.id() == token_id)
    }

    /// Remove and return a waiting token by index
    pub fn remove_waiting(&mut self, index: usize) -> Token {
        self.waiting.remove(index)
    }

    /// Re-insert a token into the waiting line at the given index
    pub fn insert_waiting(&mut self, index: usize, token: Token) {
        self.waiting.insert(index, token);
    }

    /// Take ownership of the whole waiting line, leaving it empty
    ///
    /// Paired with [`QueueState::replace_waiting`] for wholesale reorders.
    pub fn take_waiting(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.waiting)
    }

    /// Replace the waiting line wholesale
    pub fn replace_waiting(&mut self, waiting: Vec<Token>) {
        self.waiting = waiting;
    }

    /// Remove and return a held token by id
    pub fn take_on_hold(&mut self, token_id: &str) -> Option<Token> {
        let idx = self.on_hold.iter().position(|t| t.id() == token_id)?;
        Some(self.on_hold.remove(idx))
    }

    /// Add a token to the hold set
    pub fn push_on_hold(&mut self, token: Token) {
        self.on_hold.push(token);
    }

    /// Install a token as the sole current token
    ///
    /// Returns `Err` with the token if a current token already exists, so
    /// the caller can put it back without violating single-current.
    pub fn set_current(&mut self, token: Token) -> Result<(), Token> {
        if self.current.is_some() {
            return Err(token);
        }
        self.current = Some(token);
        Ok(())
    }

    /// Remove and return the current token, if any
    pub fn take_current(&mut self) -> Option<Token> {
        self.current.take()
    }

    /// Prepend a token to the completed history (most-recent-first)
    pub fn push_completed(&mut self, token: Token) {
        self.completed.insert(0, token);
    }
}
