//! Waitlist Model (排队等位)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned when a party joins the waitlist. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Party waiting for a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: EntryId,
    /// Display name, not an identity
    pub name: String,
    pub party_size: u32,
    pub estimated_wait_minutes: u32,
    /// Unix millis when the party was added
    pub time_added: i64,
}

/// Add-to-waitlist payload, as submitted by the host stand.
///
/// Numbers are signed so out-of-range submissions reach validation instead of
/// failing at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitlistEntryCreate {
    pub name: String,
    pub party_size: i64,
    pub estimated_wait_minutes: i64,
}

impl WaitlistEntryCreate {
    pub fn new(name: impl Into<String>, party_size: i64, estimated_wait_minutes: i64) -> Self {
        Self {
            name: name.into(),
            party_size,
            estimated_wait_minutes,
        }
    }
}

/// Validated entry fields, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitlistDraft {
    pub name: String,
    pub party_size: u32,
    pub estimated_wait_minutes: u32,
    pub time_added: i64,
}
