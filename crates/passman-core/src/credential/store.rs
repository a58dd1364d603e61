//! In-memory credential collection

use tracing::debug;

use super::Entry;
use crate::error::{Result, VaultError};

/// Ordered sequence of entries, unique by service
///
/// Insertion order is kept so the serialized document is deterministic.
/// Lookups are by service only. Failed mutations leave the store unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    entries: Vec<Entry>,
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from decoded entries, rejecting duplicate services
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self> {
        let mut store = Self::new();
        for entry in entries {
            if store.find_by_service(entry.service()).is_some() {
                return Err(VaultError::FormatError(format!(
                    "service '{}' appears more than once",
                    entry.service()
                )));
            }
            store.entries.push(entry);
        }
        Ok(store)
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Service names in insertion order
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Entry::service)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry for a service
    pub fn find_by_service(&self, service: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.service() == service)
    }

    /// Append a new entry
    ///
    /// Fails with [`VaultError::DuplicateService`] if the service is already
    /// present; existing entries are never overwritten.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        if self.find_by_service(entry.service()).is_some() {
            return Err(VaultError::DuplicateService(entry.service().to_string()));
        }

        debug!("Adding entry for service: {}", entry.service());
        self.entries.push(entry);
        Ok(())
    }

    /// Remove and return the entry for a service
    pub fn remove(&mut self, service: &str) -> Result<Entry> {
        let index = self
            .entries
            .iter()
            .position(|e| e.service() == service)
            .ok_or_else(|| VaultError::ServiceNotFound(service.to_string()))?;

        debug!("Removing entry for service: {}", service);
        Ok(self.entries.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Store {
        let mut store = Store::new();
        store.add(Entry::new("mail", "alice", "pw1")).unwrap();
        store.add(Entry::new("bank", "", "pw2")).unwrap();
        store
    }

    #[test]
    fn test_add_then_find() {
        let store = sample();

        let found = store.find_by_service("mail").unwrap();
        assert_eq!(found, &Entry::new("mail", "alice", "pw1"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_find_is_exact_match() {
        let store = sample();

        assert!(store.find_by_service("Mail").is_none());
        assert!(store.find_by_service("mai").is_none());
        assert!(store.find_by_service("").is_none());
    }

    #[test]
    fn test_duplicate_add_does_not_mutate() {
        let mut store = sample();
        let before = store.clone();

        let result = store.add(Entry::new("mail", "mallory", "other"));

        assert!(matches!(result, Err(VaultError::DuplicateService(s)) if s == "mail"));
        assert_eq!(store, before);
        assert_eq!(store.find_by_service("mail").unwrap().username(), "alice");
    }

    #[test]
    fn test_remove_then_find() {
        let mut store = sample();

        let removed = store.remove("mail").unwrap();
        assert_eq!(removed.password(), "pw1");
        assert!(store.find_by_service("mail").is_none());
        assert_eq!(store.services().collect::<Vec<_>>(), vec!["bank"]);
    }

    #[test]
    fn test_remove_missing_is_not_found() {
        let mut store = sample();
        let before = store.clone();

        let result = store.remove("nope");

        assert!(matches!(result, Err(VaultError::ServiceNotFound(s)) if s == "nope"));
        assert_eq!(store, before);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut store = Store::new();
        for service in ["c", "a", "b"] {
            store.add(Entry::new(service, "u", "p")).unwrap();
        }
        store.remove("a").unwrap();
        store.add(Entry::new("a", "u", "p")).unwrap();

        assert_eq!(store.services().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let result = Store::from_entries(vec![
            Entry::new("mail", "a", "1"),
            Entry::new("mail", "b", "2"),
        ]);
        assert!(matches!(result, Err(VaultError::FormatError(_))));

        let store = Store::from_entries(vec![Entry::new("mail", "a", "1")]).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
    }
}
