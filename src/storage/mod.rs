//! Durable key-value storage.
//!
//! Everything Bento persists is a whole JSON document stored under a
//! logical name.  The vault and the lists never talk to the filesystem
//! directly; they go through `KeyValueStore`, so tests can swap in the
//! in-memory implementation.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{BentoError, Result};

/// Logical document names.
pub mod keys {
    pub const NOTES: &str = "notes";
    pub const TODOS: &str = "todos";
    pub const PASSWORD_ENTRIES: &str = "password-entries";
    pub const MASTER_PIN_HASH: &str = "master-pin-hash";
}

/// A store of whole-document string values addressed by name.
///
/// Writes are synchronous: once `set` returns `Ok`, the value survives a
/// crash.  Failures surface as `BentoError::Storage` and are never retried.
pub trait KeyValueStore {
    fn get(&self, name: &str) -> Result<Option<String>>;

    fn set(&mut self, name: &str, value: &str) -> Result<()>;

    /// Delete a document.  Removing one that does not exist is not an error.
    fn remove(&mut self, name: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, name: &str) -> Result<Option<String>> {
        (**self).get(name)
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).set(name, value)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        (**self).remove(name)
    }
}

/// Read and deserialize a JSON document, or `None` if it was never written.
pub fn read_json<T, S>(store: &S, name: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(name)? {
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| BentoError::CorruptDocument {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Read a JSON list document, treating a missing document as empty.
pub fn read_list<T, S>(store: &S, name: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    Ok(read_json(store, name)?.unwrap_or_default())
}

/// Serialize `value` into the raw form stored under `name`.
pub fn to_document<T>(name: &str, value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|e| BentoError::Storage {
        name: name.to_string(),
        reason: format!("serialization: {e}"),
    })
}

/// Serialize `value` to JSON and write it under `name`.
pub fn write_json<T, S>(store: &mut S, name: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = to_document(name, value)?;
    store.set(name, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_list_reads_as_empty() {
        let store = MemoryStore::new();
        let list: Vec<String> = read_list(&store, keys::NOTES).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn json_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        write_json(&mut store, keys::TODOS, &vec!["a", "b"]).unwrap();
        assert_eq!(store.get(keys::TODOS).unwrap().as_deref(), Some(r#"["a","b"]"#));

        let list: Vec<String> = read_list(&store, keys::TODOS).unwrap();
        assert_eq!(list, vec!["a", "b"]);
    }

    #[test]
    fn corrupt_document_is_fatal() {
        let mut store = MemoryStore::new();
        store.set(keys::NOTES, "{not json").unwrap();

        let err = read_list::<String, _>(&store, keys::NOTES).unwrap_err();
        assert!(matches!(err, BentoError::CorruptDocument { .. }));
        assert!(err.is_fatal());
    }
}
