//! Todo row model
//!
//! One persisted record is either a checklist task or a rich document;
//! `is_document` selects the view it appears in.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::tasks;

/// A row identifier assigned by the remote store.
///
/// Positive values are server-assigned. Negative values are transient
/// client-side placeholders for rows whose create round-trip has not
/// completed yet; they must never be sent to the remote store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw integer value.
    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whether this id is a client-side placeholder pending creation.
    #[must_use]
    pub const fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for TodoId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// A checkbox line cached on the row itself.
///
/// Persisted alongside `content` and independently mutable; the derived
/// doc-task view is recomputed from `content` and does not read this field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedTask {
    pub line_index: usize,
    pub text: String,
    pub is_completed: bool,
}

/// A task or document row in the remote `todos` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-assigned id (negative while a create is pending)
    pub id: TodoId,
    /// Owner; row-level security scopes all queries to this user
    pub user_id: String,
    /// Short display string
    pub title: String,
    /// Optional long-form markdown body
    #[serde(default)]
    pub content: Option<String>,
    /// Checklist state, meaningful for task rows
    #[serde(default)]
    pub is_completed: bool,
    /// True for standalone rich documents, false for checklist tasks
    #[serde(default)]
    pub is_document: bool,
    /// Calendar placement and overdue styling
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Local notification trigger; set together with `due_date` by the UI
    #[serde(default)]
    pub reminder_at: Option<DateTime<Utc>>,
    /// Cached checkbox projection of `content` (may diverge; see docs)
    #[serde(default)]
    pub embedded_tasks: Option<Vec<EmbeddedTask>>,
    /// Optional grouping folder
    #[serde(default)]
    pub folder_id: Option<i64>,
    /// Server-assigned creation time; default ordering is newest first
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Build a client-side draft for a new task row.
    ///
    /// The id must be a placeholder from the cache; `created_at` is
    /// provisional and replaced by the server row on reconciliation.
    #[must_use]
    pub fn draft(id: TodoId, user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            user_id: user_id.into(),
            title: title.into(),
            content: None,
            is_completed: false,
            is_document: false,
            due_date: None,
            reminder_at: None,
            embedded_tasks: None,
            folder_id: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this row carries long-form notes.
    #[must_use]
    pub fn has_notes(&self) -> bool {
        self.content
            .as_deref()
            .is_some_and(|content| !content.trim().is_empty())
    }

    /// Whether the body contains at least one checkbox task line.
    #[must_use]
    pub fn has_embedded_tasks(&self) -> bool {
        self.content.as_deref().is_some_and(tasks::has_tasks)
    }

    /// Recompute the cached `embedded_tasks` projection from `content`.
    ///
    /// Called after content edits so the persisted cache follows the body;
    /// rows without task lines get `None` rather than an empty list.
    pub fn refresh_embedded_tasks(&mut self) {
        let lines = self.content.as_deref().map(tasks::parse_tasks);
        self.embedded_tasks = match lines {
            Some(lines) if !lines.is_empty() => Some(
                lines
                    .into_iter()
                    .map(|line| EmbeddedTask {
                        line_index: line.line_index,
                        text: line.text,
                        is_completed: line.is_completed,
                    })
                    .collect(),
            ),
            _ => None,
        };
    }
}
