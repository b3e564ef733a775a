//! Patient identity collaborator
//!
//! Patient records are owned by the external Patient Directory (the
//! registration/CRUD side of the clinic system). The queue engine only
//! needs an id and a display name at enqueue time, captured once into a
//! read-only [`PatientRef`] copied onto the token. The engine never writes
//! back to the directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only copy of a patient's identity, embedded in a token for display.
///
/// Not authoritative patient data: if the directory later renames the
/// patient, tokens issued earlier keep the name they were issued with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    /// Patient identifier in the external directory
    pub id: String,

    /// Display name at the time the token was issued
    pub name: String,
}

impl PatientRef {
    /// Create a patient reference
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Lookup interface onto the external Patient Directory.
///
/// Consumed only at enqueue time to populate the token's [`PatientRef`].
pub trait PatientDirectory {
    /// Resolve a patient id to its identity, or `None` if unknown
    fn lookup(&self, patient_id: &str) -> Option<PatientRef>;
}

/// In-memory directory backed by a map, for tests and embedding hosts.
///
/// # Example
/// ```
/// use clinic_queue_core_rs::{PatientDirectory, PatientRef, StaticDirectory};
///
/// let dir = StaticDirectory::new(vec![PatientRef::new("p-001", "Asha Rao")]);
/// assert_eq!(dir.lookup("p-001").unwrap().name, "Asha Rao");
/// assert!(dir.lookup("p-999").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    patients: HashMap<String, PatientRef>,
}

impl StaticDirectory {
    /// Build a directory from a list of patient references
    pub fn new(patients: Vec<PatientRef>) -> Self {
        Self {
            patients: patients.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    /// Add or replace a patient record
    pub fn upsert(&mut self, patient: PatientRef) {
        self.patients.insert(patient.id.clone(), patient);
    }

    /// Number of known patients
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

impl PatientDirectory for StaticDirectory {
    fn lookup(&self, patient_id: &str) -> Option<PatientRef> {
        self.patients.get(patient_id).cloned()
    }
}
