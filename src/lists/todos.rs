use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{BentoError, Result};
use crate::id::next_id;
use crate::storage::{keys, read_list, write_json, KeyValueStore};

/// A task with an optional due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,

    #[serde(default)]
    pub text: String,

    /// Free-form due date as entered (usually `YYYY-MM-DD`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    #[serde(default)]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Keys this version does not know about, kept so they round-trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The to-do list, persisted under `todos`.
pub struct Todos<S> {
    store: S,
}

impl<S: KeyValueStore> Todos<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Todo>> {
        read_list(&self.store, keys::TODOS)
    }

    pub fn add(&mut self, text: &str, due_date: Option<&str>) -> Result<Todo> {
        validate_text(text)?;

        let mut todos = self.list()?;
        let now = Utc::now();
        let todo = Todo {
            id: next_id(todos.iter().map(|t| t.id.as_str())),
            text: text.to_string(),
            due_date: normalize_due(due_date),
            completed: false,
            created_at: Some(now),
            updated_at: Some(now),
            extra: Map::new(),
        };
        todos.push(todo.clone());
        self.save(&todos)?;

        debug!(id = %todo.id, "todo added");
        Ok(todo)
    }

    pub fn update(&mut self, id: &str, text: &str, due_date: Option<&str>) -> Result<Todo> {
        validate_text(text)?;
        self.modify(id, |todo| {
            todo.text = text.to_string();
            todo.due_date = normalize_due(due_date);
            todo.updated_at = Some(Utc::now());
        })
    }

    /// Flip the completion flag.
    pub fn toggle(&mut self, id: &str) -> Result<Todo> {
        self.modify(id, |todo| todo.completed = !todo.completed)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        let mut todos = self.list()?;
        let before = todos.len();
        todos.retain(|t| t.id != id);
        if todos.len() == before {
            return Err(BentoError::not_found("Task", id));
        }
        self.save(&todos)
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn modify(&mut self, id: &str, change: impl FnOnce(&mut Todo)) -> Result<Todo> {
        let mut todos = self.list()?;
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| BentoError::not_found("Task", id))?;
        change(todo);
        let changed = todo.clone();

        self.save(&todos)?;
        Ok(changed)
    }

    fn save(&mut self, todos: &[Todo]) -> Result<()> {
        write_json(&mut self.store, keys::TODOS, todos)
    }
}

fn validate_text(text: &str) -> Result<()> {
    if text.is_empty() {
        return Err(BentoError::Validation(
            "Task description cannot be empty".into(),
        ));
    }
    Ok(())
}

fn normalize_due(due_date: Option<&str>) -> Option<String> {
    due_date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}
