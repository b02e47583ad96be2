//! Activity timeline models
//!
//! Entries are owned by the timeline service and append-only; the client
//! only reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::TodoId;

/// Action recorded in the activity log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityAction {
    Create,
    Complete,
    Uncomplete,
    UpdateContent,
    Delete,
}

impl ActivityAction {
    /// Short human label for list rendering.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Complete => "completed",
            Self::Uncomplete => "reopened",
            Self::UpdateContent => "edited",
            Self::Delete => "deleted",
        }
    }
}

/// Snapshot of row fields captured when the action happened.
///
/// The row itself may have been edited or deleted since, so the timeline
/// renders from this snapshot, never from the live row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMetadata {
    #[serde(default)]
    pub title: Option<String>,
}

/// One append-only activity log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub action_type: ActivityAction,
    pub todo_id: TodoId,
    #[serde(default)]
    pub metadata: ActivityMetadata,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&ActivityAction::UpdateContent).unwrap(),
            "\"UPDATE_CONTENT\""
        );
        let parsed: ActivityAction = serde_json::from_str("\"UNCOMPLETE\"").unwrap();
        assert_eq!(parsed, ActivityAction::Uncomplete);
    }

    #[test]
    fn entry_parses_with_missing_metadata() {
        let raw = r#"{
            "id": 9,
            "action_type": "DELETE",
            "todo_id": 42,
            "timestamp": "2026-02-01T08:30:00Z"
        }"#;
        let entry: ActivityEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.action_type, ActivityAction::Delete);
        assert_eq!(entry.todo_id, TodoId::new(42));
        assert_eq!(entry.metadata.title, None);
    }
}
