//! Backup export and import.
//!
//! A backup is one JSON document:
//!
//! ```json
//! { "notes": [...], "todos": [...], "passwords": [...], "masterPin": "<hex>" }
//! ```
//!
//! Passwords travel as ciphertext together with the PIN hash; the key
//! material never leaves the process.  An imported backup only decrypts
//! under the PIN whose hash it carries.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use super::entry::CredentialEntry;
use super::session::Vault;
use crate::errors::{BentoError, Result};
use crate::lists::{Note, Todo};
use crate::storage::{keys, read_list, to_document, KeyValueStore};

/// A complete, validated backup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub notes: Vec<Note>,
    pub todos: Vec<Todo>,
    pub passwords: Vec<CredentialEntry>,
    #[serde(rename = "masterPin")]
    pub master_pin: String,
}

/// The backup document before validation.
#[derive(Deserialize)]
struct RawSnapshot {
    notes: Option<Value>,
    todos: Option<Value>,
    passwords: Option<Value>,
    #[serde(rename = "masterPin")]
    master_pin: Option<Value>,
}

impl Snapshot {
    /// Parse and validate a backup document.
    ///
    /// All four keys must be present.  The three lists may be empty, but
    /// `masterPin` must be a non-empty string.
    pub fn parse(json: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(json)
            .map_err(|e| BentoError::InvalidSnapshot(format!("not a valid JSON object: {e}")))?;

        let master_pin = match raw.master_pin {
            Some(Value::String(hash)) if !hash.trim().is_empty() => hash.trim().to_string(),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(BentoError::InvalidSnapshot("masterPin is missing".into()))
            }
            Some(_) => {
                return Err(BentoError::InvalidSnapshot(
                    "masterPin must be a string".into(),
                ))
            }
        };

        Ok(Self {
            notes: list_field(raw.notes, "notes")?,
            todos: list_field(raw.todos, "todos")?,
            passwords: list_field(raw.passwords, "passwords")?,
            master_pin,
        })
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BentoError::CommandFailed(format!("backup serialization: {e}")))
    }
}

fn list_field<T: serde::de::DeserializeOwned>(value: Option<Value>, name: &str) -> Result<Vec<T>> {
    match value {
        Some(list @ Value::Array(_)) => serde_json::from_value(list)
            .map_err(|e| BentoError::InvalidSnapshot(format!("{name}: {e}"))),
        Some(Value::Null) | None => Err(BentoError::InvalidSnapshot(format!(
            "{name} is missing"
        ))),
        Some(_) => Err(BentoError::InvalidSnapshot(format!(
            "{name} must be a list"
        ))),
    }
}

impl<S: KeyValueStore> Vault<S> {
    /// Snapshot everything in durable storage.
    ///
    /// Works locked or unlocked; passwords are exported as stored.
    pub fn export(&self) -> Result<Snapshot> {
        let master_pin = self
            .pin_hash
            .clone()
            .ok_or(BentoError::NoVaultConfigured)?;

        let snapshot = Snapshot {
            notes: read_list(&self.store, keys::NOTES)?,
            todos: read_list(&self.store, keys::TODOS)?,
            passwords: read_list(&self.store, keys::PASSWORD_ENTRIES)?,
            master_pin,
        };

        info!(
            notes = snapshot.notes.len(),
            todos = snapshot.todos.len(),
            passwords = snapshot.passwords.len(),
            "exported backup"
        );
        Ok(snapshot)
    }

    /// Replace all stored data with `snapshot`.
    ///
    /// The four documents are written in turn; if any write fails, the
    /// ones already written are put back to their previous contents
    /// before the error is returned, and the vault is left untouched.
    ///
    /// An unlocked vault keeps its current key material and swaps in the
    /// imported entries; they only decrypt if the backup was made under
    /// the same PIN.  Otherwise the vault ends up locked under the
    /// imported hash.
    pub fn import(&mut self, snapshot: Snapshot) -> Result<()> {
        let Snapshot {
            notes,
            todos,
            passwords,
            master_pin,
        } = snapshot;

        let documents = [
            (keys::NOTES, to_document(keys::NOTES, &notes)?),
            (keys::TODOS, to_document(keys::TODOS, &todos)?),
            (
                keys::PASSWORD_ENTRIES,
                to_document(keys::PASSWORD_ENTRIES, &passwords)?,
            ),
            (keys::MASTER_PIN_HASH, master_pin.clone()),
        ];

        let mut previous = Vec::with_capacity(documents.len());
        for (name, _) in &documents {
            previous.push((*name, self.store.get(name)?));
        }

        for (written, (name, value)) in documents.iter().enumerate() {
            if let Err(e) = self.store.set(name, value) {
                error!(document = *name, error = %e, "import failed, restoring previous data");
                self.restore(&previous[..written]);
                return Err(e);
            }
        }

        info!(
            notes = notes.len(),
            todos = todos.len(),
            passwords = passwords.len(),
            "imported backup"
        );

        self.pin_hash = Some(master_pin);
        if let Some(session) = self.session.as_mut() {
            session.entries = passwords;
        }
        Ok(())
    }

    /// Put documents back the way they were before a failed import.
    fn restore(&mut self, previous: &[(&str, Option<String>)]) {
        for (name, value) in previous {
            let restored = match value {
                Some(raw) => self.store.set(name, raw),
                None => self.store.remove(name),
            };
            if let Err(e) = restored {
                error!(document = *name, error = %e, "could not restore document");
            }
        }
    }

    /// Parse `json` as a backup and import it.
    pub fn import_json(&mut self, json: &str) -> Result<()> {
        let snapshot = Snapshot::parse(json)?;
        self.import(snapshot)
    }
}
