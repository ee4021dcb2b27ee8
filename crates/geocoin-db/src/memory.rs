//! In-memory backend.

use std::collections::BTreeMap;

use crate::error::DbError;
use crate::store::KvStore;

/// A [`KvStore`] held in a map. Contents vanish with the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    records: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record exists at `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DbError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), DbError> {
        self.records.insert(key.to_owned(), value.to_vec());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DbError> {
        self.records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_overwrites() {
        let mut store = MemoryStore::new();
        assert!(store.set("caches", b"{}").is_ok());
        assert!(store.set("caches", b"{\"0,0\":1}").is_ok());
        assert_eq!(store.get("caches").ok().flatten(), Some(b"{\"0,0\":1}".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = MemoryStore::new();
        assert!(store.set("inventory", b"[]").is_ok());
        assert!(store.set("travelHistory", b"[]").is_ok());
        assert!(store.clear().is_ok());
        assert!(store.is_empty());
        assert_eq!(store.get("inventory").ok().flatten(), None);
    }
}
