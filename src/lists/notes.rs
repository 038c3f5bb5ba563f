use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{BentoError, Result};
use crate::id::next_id;
use crate::storage::{keys, read_list, write_json, KeyValueStore};

/// A free-form note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Keys this version does not know about, kept so they round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Note {
    /// Title for display, falling back to a placeholder.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled Note"
        } else {
            &self.title
        }
    }
}

/// The notes list, persisted under `notes`.
pub struct Notes<S> {
    store: S,
}

impl<S: KeyValueStore> Notes<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Note>> {
        read_list(&self.store, keys::NOTES)
    }

    pub fn get(&self, id: &str) -> Result<Note> {
        self.list()?
            .into_iter()
            .find(|n| n.id == id)
            .ok_or_else(|| BentoError::not_found("Note", id))
    }

    /// Add a note.  The title may be empty; the content may not.
    pub fn add(&mut self, title: &str, content: &str) -> Result<Note> {
        validate_content(content)?;

        let mut notes = self.list()?;
        let now = Utc::now();
        let note = Note {
            id: next_id(notes.iter().map(|n| n.id.as_str())),
            title: title.to_string(),
            content: content.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            extra: Map::new(),
        };
        notes.push(note.clone());
        self.save(&notes)?;

        debug!(id = %note.id, "note added");
        Ok(note)
    }

    pub fn update(&mut self, id: &str, title: &str, content: &str) -> Result<Note> {
        validate_content(content)?;

        let mut notes = self.list()?;
        let note = notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| BentoError::not_found("Note", id))?;
        note.title = title.to_string();
        note.content = content.to_string();
        note.updated_at = Some(Utc::now());
        let updated = note.clone();

        self.save(&notes)?;
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let mut notes = self.list()?;
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(BentoError::not_found("Note", id));
        }
        self.save(&notes)
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn save(&mut self, notes: &[Note]) -> Result<()> {
        write_json(&mut self.store, keys::NOTES, notes)
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(BentoError::Validation(
            "Note content cannot be empty".into(),
        ));
    }
    Ok(())
}
