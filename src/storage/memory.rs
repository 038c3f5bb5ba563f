//! In-memory `KeyValueStore`, used by tests and dry runs.

use std::collections::BTreeMap;

use super::KeyValueStore;
use crate::errors::{BentoError, Result};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    documents: BTreeMap<String, String>,
    fail_writes: bool,
    fail_on_write: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, to exercise the fatal path.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Fail only the `nth` `set` from now on (1-based); later writes succeed.
    pub fn fail_on_write(&mut self, nth: usize) {
        self.fail_on_write = Some(nth);
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, name: &str) -> Result<Option<String>> {
        Ok(self.documents.get(name).cloned())
    }

    fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let countdown_hit = match self.fail_on_write {
            Some(1) => {
                self.fail_on_write = None;
                true
            }
            Some(n) => {
                self.fail_on_write = Some(n - 1);
                false
            }
            None => false,
        };
        if self.fail_writes || countdown_hit {
            return Err(BentoError::Storage {
                name: name.to_string(),
                reason: "write rejected".into(),
            });
        }
        self.documents.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        if self.fail_writes {
            return Err(BentoError::Storage {
                name: name.to_string(),
                reason: "remove rejected".into(),
            });
        }
        self.documents.remove(name);
        Ok(())
    }
}
