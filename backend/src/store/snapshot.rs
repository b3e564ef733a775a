//! Snapshot structures - serialize/restore queue state
//!
//! A snapshot captures the complete queue aggregate at a point in time:
//! the current token, the waiting line, the hold set, and the completed
//! history. Observers always receive whole snapshots, never diffs.
//!
//! # Critical Invariants
//!
//! - **Single current**: the snapshot shape allows at most one current token
//! - **Status/set agreement**: each token's status matches the set it is in
//! - **Uniqueness**: no id or number appears twice across the four sets

use crate::models::patient::PatientRef;
use crate::models::queue::QueueState;
use crate::models::token::{Token, TokenStatus};
use crate::store::SnapshotError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Complete queue snapshot for one clinic-day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueSnapshot {
    /// Token with the doctor, if any
    pub current: Option<TokenSnapshot>,

    /// Waiting line in arrival order
    pub waiting: Vec<TokenSnapshot>,

    /// Held tokens in insertion order
    pub on_hold: Vec<TokenSnapshot>,

    /// Completed tokens, most-recent-first
    pub completed: Vec<TokenSnapshot>,
}

impl QueueSnapshot {
    /// Snapshot of an empty queue
    pub fn empty() -> Self {
        Self {
            current: None,
            waiting: Vec::new(),
            on_hold: Vec::new(),
            completed: Vec::new(),
        }
    }

    /// Total tokens across all four sets
    pub fn total_tokens(&self) -> usize {
        self.current.iter().count()
            + self.waiting.len()
            + self.on_hold.len()
            + self.completed.len()
    }

    /// Iterate over every token in the snapshot
    pub fn all_tokens(&self) -> impl Iterator<Item = &TokenSnapshot> {
        self.current
            .iter()
            .chain(self.waiting.iter())
            .chain(self.on_hold.iter())
            .chain(self.completed.iter())
    }
}

/// Single token within a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub id: String,
    pub number: u32,
    pub patient: PatientRef,
    pub is_emergency: bool,
    pub status: TokenStatus,
    pub hold_at: Option<u64>,
    pub completed_at: Option<u64>,
}

impl From<&Token> for TokenSnapshot {
    fn from(token: &Token) -> Self {
        TokenSnapshot {
            id: token.id().to_string(),
            number: token.number(),
            patient: token.patient().clone(),
            is_emergency: token.is_emergency(),
            status: token.status(),
            hold_at: token.hold_at(),
            completed_at: token.completed_at(),
        }
    }
}

impl From<TokenSnapshot> for Token {
    fn from(snapshot: TokenSnapshot) -> Self {
        Token::from_snapshot(
            snapshot.id,
            snapshot.number,
            snapshot.patient,
            snapshot.is_emergency,
            snapshot.status,
            snapshot.hold_at,
            snapshot.completed_at,
        )
    }
}

impl From<&QueueState> for QueueSnapshot {
    fn from(state: &QueueState) -> Self {
        QueueSnapshot {
            current: state.current().map(TokenSnapshot::from),
            waiting: state.waiting().iter().map(TokenSnapshot::from).collect(),
            on_hold: state.on_hold().iter().map(TokenSnapshot::from).collect(),
            completed: state.completed().iter().map(TokenSnapshot::from).collect(),
        }
    }
}

impl From<QueueSnapshot> for QueueState {
    fn from(snapshot: QueueSnapshot) -> Self {
        QueueState::from_parts(
            snapshot.current.map(Token::from),
            snapshot.waiting.into_iter().map(Token::from).collect(),
            snapshot.on_hold.into_iter().map(Token::from).collect(),
            snapshot.completed.into_iter().map(Token::from).collect(),
        )
    }
}

// ============================================================================
// Digest
// ============================================================================

/// Compute deterministic SHA256 digest of a snapshot
///
/// Uses canonical JSON (sorted object keys) so the digest is independent of
/// serializer map ordering. The store keeps the digest beside the blob and
/// re-checks it on read to detect corruption.
pub fn compute_snapshot_digest(snapshot: &QueueSnapshot) -> Result<String, SnapshotError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(snapshot)
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate snapshot integrity
///
/// Checks the queue invariants that survive serialization:
/// - Each token's status agrees with the set holding it
/// - No token id appears in more than one set
/// - No token number is shared within the day
pub fn validate_snapshot(snapshot: &QueueSnapshot) -> Result<(), SnapshotError> {
    let sets: [(&str, TokenStatus, &[TokenSnapshot]); 3] = [
        ("waiting", TokenStatus::Waiting, &snapshot.waiting),
        ("on_hold", TokenStatus::Hold, &snapshot.on_hold),
        ("completed", TokenStatus::Completed, &snapshot.completed),
    ];

    if let Some(current) = &snapshot.current {
        if current.status != TokenStatus::Current {
            return Err(SnapshotError::Validation(format!(
                "Current slot holds token #{} with status {:?}",
                current.number, current.status
            )));
        }
    }

    for (set_name, expected, tokens) in sets {
        for token in tokens {
            if token.status != expected {
                return Err(SnapshotError::Validation(format!(
                    "Token #{} in {} set has status {:?}",
                    token.number, set_name, token.status
                )));
            }
        }
    }

    let mut seen_ids = HashSet::new();
    let mut seen_numbers = HashSet::new();
    for token in snapshot.all_tokens() {
        if !seen_ids.insert(token.id.as_str()) {
            return Err(SnapshotError::Validation(format!(
                "Token id {} appears in more than one set",
                token.id
            )));
        }
        if !seen_numbers.insert(token.number) {
            return Err(SnapshotError::Validation(format!(
                "Duplicate token number {}",
                token.number
            )));
        }
    }

    Ok(())
}
