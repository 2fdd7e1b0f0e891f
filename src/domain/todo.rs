use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::{TodoError, TodoResult};

/// Opaque todo identifier. Generated once at creation and never reassigned.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl From<String> for TodoId {
    fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for TodoId {
    fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    id: TodoId,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: u64,
}

impl Todo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> TodoResult<Self> {
        let title = title.into();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        let now = Utc::now();
        Ok(Self {
            id: TodoId::generate(),
            title,
            description: description.into(),
            completed: false,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Replaces title and description. On an empty title nothing changes.
    pub fn update(&mut self, title: impl Into<String>, description: impl Into<String>) -> TodoResult<()> {
        let title = title.into();
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }
        self.title = title;
        self.description = description.into();
        self.touch();
        Ok(())
    }

    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.touch();
    }

    pub fn mark_incomplete(&mut self) {
        self.completed = false;
        self.touch();
    }

    pub fn id(&self) -> &TodoId { &self.id }
    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn is_completed(&self) -> bool { self.completed }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    /// Write-back counter checked by repositories on update.
    pub fn version(&self) -> u64 { self.version }

    pub(crate) fn bump_version(&mut self) { self.version += 1; }

    // updated_at must move forward even when the wall clock stalls or steps back.
    fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::nanoseconds(1)
        };
    }
}

/// Input of the create use case.
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: Option<String>,
}

/// Input of the update use case. A missing description clears it.
#[derive(Debug, Clone)]
pub struct UpdateTodo {
    pub title: String,
    pub description: Option<String>,
}
