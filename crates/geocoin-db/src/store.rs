//! The opaque byte-store interface.
//!
//! [`KvStore`] deals in whole values only.
//! Typed records go through [`JsonRecords`], which every `KvStore` gets
//! for free.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::DbError;

/// A synchronous key-value byte store.
///
/// Writes are whole-record replaces that have completed when `set`
/// returns.
pub trait KvStore: Send {
    /// Read the bytes stored at `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DbError>;

    /// Replace the bytes stored at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), DbError>;

    /// Remove every record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the backend cannot be cleared.
    fn clear(&mut self) -> Result<(), DbError>;
}

impl<S: KvStore + ?Sized> KvStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, DbError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), DbError> {
        (**self).set(key, value)
    }

    fn clear(&mut self) -> Result<(), DbError> {
        (**self).clear()
    }
}

/// JSON record helpers over any [`KvStore`].
pub trait JsonRecords: KvStore {
    /// Serialize `value` as JSON and store it at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if serialization fails, or the
    /// backend's error if the write fails.
    fn set_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), DbError> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, &bytes)
    }

    /// Read the value at `key` and deserialize it from JSON.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the stored bytes are not a
    /// valid `T`, or the backend's error if the read fails.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, DbError> {
        self.get(key)?
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(DbError::from)
    }
}

impl<S: KvStore + ?Sized> JsonRecords for S {}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn json_round_trip() {
        let mut store = MemoryStore::new();
        let mut record = BTreeMap::new();
        record.insert("0,0".to_owned(), vec![1_u32, 2]);
        assert!(store.set_json("caches", &record).is_ok());

        let back: Option<BTreeMap<String, Vec<u32>>> = store.get_json("caches").ok().flatten();
        assert_eq!(back, Some(record));
    }

    #[test]
    fn absent_key_is_none() {
        let store = MemoryStore::new();
        let value: Result<Option<Vec<u32>>, DbError> = store.get_json("inventory");
        assert!(matches!(value, Ok(None)));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let mut store = MemoryStore::new();
        assert!(store.set("inventory", b"[object Object]").is_ok());
        let value: Result<Option<Vec<u32>>, DbError> = store.get_json("inventory");
        assert!(matches!(value, Err(DbError::Serialization(_))));
    }

    #[test]
    fn boxed_store_is_a_store() {
        let mut store: Box<dyn KvStore> = Box::new(MemoryStore::new());
        assert!(store.set_json("inventory", &[3_u32]).is_ok());
        let value: Option<Vec<u32>> = store.get_json("inventory").ok().flatten();
        assert_eq!(value, Some(vec![3]));
    }
}
