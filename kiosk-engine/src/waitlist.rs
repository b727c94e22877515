//! Waitlist - parties waiting for a table, in arrival order
//!
//! Removal by name deletes every entry with that name, so two parties sharing
//! a name leave together. Use [`Waitlist::remove_by_id`] to seat one of them.

use shared::models::{EntryId, WaitlistDraft, WaitlistEntry, WaitlistEntryCreate};
use std::sync::Arc;

use crate::clock::Clock;
use crate::core::{EngineError, EngineResult};
use crate::store::VenueStore;
use crate::utils::retry::retry_read;
use crate::utils::validation::{
    MAX_ESTIMATED_WAIT_MINUTES, MAX_NAME_LEN, validate_range, validate_required_text,
};

#[derive(Clone)]
pub struct Waitlist {
    store: Arc<dyn VenueStore>,
    clock: Arc<dyn Clock>,
}

impl Waitlist {
    pub fn new(store: Arc<dyn VenueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate and append a party. Nothing is written when validation fails.
    pub fn add(&self, input: WaitlistEntryCreate) -> EngineResult<WaitlistEntry> {
        let draft = self.validate(&input)?;
        let entry = self.store.insert_entry(draft)?;

        tracing::info!(
            id = %entry.id,
            name = %entry.name,
            party_size = entry.party_size,
            estimated_wait_minutes = entry.estimated_wait_minutes,
            "Party added to waitlist"
        );
        Ok(entry)
    }

    /// Remove every entry named `name`; returns how many were removed
    pub fn remove(&self, name: &str) -> EngineResult<usize> {
        let name = name.trim();
        let removed = self.store.remove_entries_named(name)?;
        if removed == 0 {
            tracing::debug!(name, "Remove matched no waitlist entry");
            return Err(EngineError::NotFound(format!("waitlist entry '{name}'")));
        }

        tracing::info!(name, removed, "Party removed from waitlist");
        Ok(removed)
    }

    pub fn remove_by_id(&self, id: EntryId) -> EngineResult<WaitlistEntry> {
        let entry = self
            .store
            .remove_entry(id)?
            .ok_or_else(|| EngineError::NotFound(format!("waitlist entry #{id}")))?;

        tracing::info!(id = %entry.id, name = %entry.name, "Party removed from waitlist");
        Ok(entry)
    }

    /// Current entries in insertion order; a fresh read every call
    pub fn list(&self) -> EngineResult<Vec<WaitlistEntry>> {
        Ok(retry_read("list_entries", || self.store.list_entries())?)
    }

    /// People waiting across all parties, 0 when empty
    pub fn total_party_size(&self) -> EngineResult<u64> {
        Ok(retry_read("total_party_size", || {
            self.store.total_party_size()
        })?)
    }

    fn validate(&self, input: &WaitlistEntryCreate) -> EngineResult<WaitlistDraft> {
        let name = validate_required_text(&input.name, "name", MAX_NAME_LEN)?;
        let party_size = validate_range(input.party_size, "party_size", 1, i64::from(u32::MAX))?;
        let estimated_wait_minutes = validate_range(
            input.estimated_wait_minutes,
            "estimated_wait_minutes",
            0,
            MAX_ESTIMATED_WAIT_MINUTES,
        )?;

        Ok(WaitlistDraft {
            name: name.to_string(),
            party_size,
            estimated_wait_minutes,
            time_added: self.clock.now_millis(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;

    fn waitlist() -> (Waitlist, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let waitlist = Waitlist::new(Arc::new(MemoryStore::new()), clock.clone());
        (waitlist, clock)
    }

    fn names(waitlist: &Waitlist) -> Vec<String> {
        waitlist
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect()
    }

    #[test]
    fn test_add_and_total() {
        let (waitlist, clock) = waitlist();
        let alice = waitlist.add(WaitlistEntryCreate::new("Alice", 2, 10)).unwrap();
        clock.advance(5_000);
        let bob = waitlist.add(WaitlistEntryCreate::new("Bob", 4, 15)).unwrap();

        assert_eq!(alice.time_added, 1_000);
        assert_eq!(bob.time_added, 6_000);
        assert!(alice.id < bob.id);
        assert_eq!(names(&waitlist), ["Alice", "Bob"]);
        assert_eq!(waitlist.total_party_size().unwrap(), 6);
    }

    #[test]
    fn test_remove_by_name() {
        let (waitlist, _) = waitlist();
        waitlist.add(WaitlistEntryCreate::new("Alice", 2, 10)).unwrap();
        waitlist.add(WaitlistEntryCreate::new("Bob", 4, 15)).unwrap();

        assert_eq!(waitlist.remove("Alice").unwrap(), 1);
        assert_eq!(names(&waitlist), ["Bob"]);

        let err = waitlist.remove("Carol").unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        assert_eq!(names(&waitlist), ["Bob"]);
    }

    #[test]
    fn test_remove_by_name_takes_all_duplicates() {
        let (waitlist, _) = waitlist();
        waitlist.add(WaitlistEntryCreate::new("Lee", 2, 5)).unwrap();
        waitlist.add(WaitlistEntryCreate::new("Kim", 3, 5)).unwrap();
        waitlist.add(WaitlistEntryCreate::new("Lee", 6, 20)).unwrap();

        assert_eq!(waitlist.remove("Lee").unwrap(), 2);
        assert_eq!(names(&waitlist), ["Kim"]);
    }

    #[test]
    fn test_remove_by_id_keeps_namesakes() {
        let (waitlist, _) = waitlist();
        let first = waitlist.add(WaitlistEntryCreate::new("Lee", 2, 5)).unwrap();
        let second = waitlist.add(WaitlistEntryCreate::new("Lee", 6, 20)).unwrap();

        let removed = waitlist.remove_by_id(first.id).unwrap();
        assert_eq!(removed, first);

        let remaining = waitlist.list().unwrap();
        assert_eq!(remaining, vec![second]);
        assert!(matches!(
            waitlist.remove_by_id(first.id),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_party_size_leaves_waitlist_unchanged() {
        let (waitlist, _) = waitlist();
        waitlist.add(WaitlistEntryCreate::new("Alice", 2, 10)).unwrap();

        let err = waitlist.add(WaitlistEntryCreate::new("Dan", 0, 10)).unwrap_err();
        match err {
            EngineError::InvalidInput { field, .. } => assert_eq!(field, "party_size"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(names(&waitlist), ["Alice"]);
        assert_eq!(waitlist.total_party_size().unwrap(), 2);
    }

    #[test]
    fn test_validation_rules() {
        let (waitlist, _) = waitlist();
        let field_of = |input| match waitlist.add(input) {
            Err(EngineError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        };

        assert_eq!(field_of(WaitlistEntryCreate::new("   ", 2, 10)), "name");
        assert_eq!(field_of(WaitlistEntryCreate::new("x".repeat(201), 2, 10)), "name");
        assert_eq!(field_of(WaitlistEntryCreate::new("Eve", -3, 10)), "party_size");
        assert_eq!(
            field_of(WaitlistEntryCreate::new("Eve", 2, -1)),
            "estimated_wait_minutes"
        );
        assert_eq!(
            field_of(WaitlistEntryCreate::new("Eve", 2, 24 * 60 + 1)),
            "estimated_wait_minutes"
        );
        assert!(waitlist.list().unwrap().is_empty());
    }

    #[test]
    fn test_name_is_trimmed() {
        let (waitlist, _) = waitlist();
        let entry = waitlist.add(WaitlistEntryCreate::new("  Alice  ", 2, 0)).unwrap();
        assert_eq!(entry.name, "Alice");
        assert_eq!(entry.estimated_wait_minutes, 0);
        assert_eq!(waitlist.remove(" Alice").unwrap(), 1);
    }

    #[test]
    fn test_empty_total_is_zero() {
        let (waitlist, _) = waitlist();
        assert_eq!(waitlist.total_party_size().unwrap(), 0);
        assert!(waitlist.list().unwrap().is_empty());
    }
}
