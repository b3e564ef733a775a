//! Token model
//!
//! A token is one patient's place in the walk-in line for a clinic-day.
//! Each token has:
//! - An opaque id (UUID) and a human-facing number (monotonic per day)
//! - A read-only patient reference for display
//! - An emergency flag, set at creation and immutable thereafter
//! - A status (Waiting, Current, Hold, Completed)
//! - Historical timestamps for hold/completion
//!
//! Status moves only through the guarded transition methods below; the
//! queue engine is the sole caller. Tokens are never deleted: a completed
//! token stays in history for the rest of the day.

use crate::models::patient::PatientRef;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token status
///
/// Tracks the lifecycle of a patient's place in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
    /// In the waiting line, eligible for dispatch
    Waiting,

    /// With the doctor right now (at most one token system-wide)
    Current,

    /// Parked aside; excluded from dispatch until recalled
    Hold,

    /// Consultation finished; kept as history for the day
    Completed,
}

/// Errors raised by token state transitions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token #{number} is {status:?}, not Waiting")]
    NotWaiting { number: u32, status: TokenStatus },

    #[error("Token #{number} is {status:?}, not Current")]
    NotCurrent { number: u32, status: TokenStatus },

    #[error("Token #{number} is {status:?}, not on hold")]
    NotOnHold { number: u32, status: TokenStatus },

    #[error("Token #{number} cannot be held from {status:?}")]
    NotHoldable { number: u32, status: TokenStatus },
}

/// A queue ticket for one patient visit
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{PatientRef, Token, TokenStatus};
///
/// let token = Token::new(17, PatientRef::new("p-001", "Asha Rao"), false);
/// assert_eq!(token.number(), 17);
/// assert_eq!(token.status(), TokenStatus::Waiting);
/// assert!(!token.is_emergency());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique token identifier (UUID)
    id: String,

    /// Human-facing token number, unique within the clinic-day
    number: u32,

    /// Read-only patient identity copy for display
    patient: PatientRef,

    /// Emergency flag: overrides arrival-order dispatch priority
    is_emergency: bool,

    /// Current status
    status: TokenStatus,

    /// When the token last entered Hold (milliseconds), if ever
    hold_at: Option<u64>,

    /// When the token entered Completed (milliseconds), if ever
    completed_at: Option<u64>,
}

impl Token {
    /// Create a new token in `Waiting`
    ///
    /// The number is assigned by the queue engine (`max + 1` over the day);
    /// the token itself does not validate uniqueness.
    pub fn new(number: u32, patient: PatientRef, is_emergency: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            number,
            patient,
            is_emergency,
            status: TokenStatus::Waiting,
            hold_at: None,
            completed_at: None,
        }
    }

    /// Restore a token from a persisted snapshot, preserving id and history
    #[allow(clippy::too_many_arguments)]
    pub fn from_snapshot(
        id: String,
        number: u32,
        patient: PatientRef,
        is_emergency: bool,
        status: TokenStatus,
        hold_at: Option<u64>,
        completed_at: Option<u64>,
    ) -> Self {
        Self {
            id,
            number,
            patient,
            is_emergency,
            status,
            hold_at,
            completed_at,
        }
    }

    /// Get token id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get token number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Get the patient reference
    pub fn patient(&self) -> &PatientRef {
        &self.patient
    }

    /// Whether this token carries the emergency flag
    pub fn is_emergency(&self) -> bool {
        self.is_emergency
    }

    /// Get current status
    pub fn status(&self) -> TokenStatus {
        self.status
    }

    /// When the token last entered Hold, if ever
    pub fn hold_at(&self) -> Option<u64> {
        self.hold_at
    }

    /// When the token was completed, if ever
    pub fn completed_at(&self) -> Option<u64> {
        self.completed_at
    }

    /// Check if token is waiting
    pub fn is_waiting(&self) -> bool {
        self.status == TokenStatus::Waiting
    }

    /// Promote a waiting token to `Current`
    pub(crate) fn mark_current(&mut self) -> Result<(), TokenError> {
        if self.status != TokenStatus::Waiting {
            return Err(TokenError::NotWaiting {
                number: self.number,
                status: self.status,
            });
        }
        self.status = TokenStatus::Current;
        Ok(())
    }

    /// Park a waiting or current token on hold, stamping a fresh `hold_at`
    ///
    /// A recalled-then-held token gets a new timestamp each time it enters
    /// Hold; earlier values are overwritten, completed history is not.
    pub(crate) fn mark_hold(&mut self, now_millis: u64) -> Result<(), TokenError> {
        match self.status {
            TokenStatus::Waiting | TokenStatus::Current => {
                self.status = TokenStatus::Hold;
                self.hold_at = Some(now_millis);
                Ok(())
            }
            status => Err(TokenError::NotHoldable {
                number: self.number,
                status,
            }),
        }
    }

    /// Finish the current consultation, stamping `completed_at` exactly once
    pub(crate) fn mark_completed(&mut self, now_millis: u64) -> Result<(), TokenError> {
        if self.status != TokenStatus::Current {
            return Err(TokenError::NotCurrent {
                number: self.number,
                status: self.status,
            });
        }
        self.status = TokenStatus::Completed;
        if self.completed_at.is_none() {
            self.completed_at = Some(now_millis);
        }
        Ok(())
    }

    /// Return a held token to the waiting line (recall)
    ///
    /// `hold_at` is kept as history; only the status changes.
    pub(crate) fn mark_waiting(&mut self) -> Result<(), TokenError> {
        if self.status != TokenStatus::Hold {
            return Err(TokenError::NotOnHold {
                number: self.number,
                status: self.status,
            });
        }
        self.status = TokenStatus::Waiting;
        Ok(())
    }
}
