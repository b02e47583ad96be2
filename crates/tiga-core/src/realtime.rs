//! Realtime row-change feed.
//!
//! The backend pushes `postgres_changes` events for the signed-in user's
//! rows. This module decodes those payloads and pumps them into the
//! service, where they merge into the cache through the same serialized
//! path as optimistic writes. The transport that produces the raw
//! payloads (websocket, test harness) stays behind an `mpsc` channel so
//! the reconciliation logic is testable without a live socket.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{Error, Result};
use crate::models::{Todo, TodoId};
use crate::remote::TodoStore;
use crate::service::TodoService;

/// Kind of row change pushed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowEvent {
    Insert,
    Update,
    Delete,
}

/// One decoded row change, ready to merge into the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct RowChange {
    pub event: RowEvent,
    /// Full row for inserts and updates; absent for deletes.
    pub new: Option<Todo>,
    /// Deleted row id; deletes carry only the replica identity columns.
    pub old_id: Option<TodoId>,
}

#[derive(Debug, Deserialize)]
struct RawChange {
    #[serde(rename = "eventType")]
    event_type: RowEvent,
    #[serde(default)]
    new: Option<Value>,
    #[serde(default)]
    old: Option<OldRow>,
}

#[derive(Debug, Deserialize)]
struct OldRow {
    #[serde(default)]
    id: Option<TodoId>,
}

/// Decode one `postgres_changes` payload.
///
/// Inserts and updates must carry a full row in `new`; deletes must carry
/// at least the row id in `old`.
pub fn decode_change(payload: &Value) -> Result<RowChange> {
    let raw: RawChange = serde_json::from_value(payload.clone())?;
    match raw.event_type {
        RowEvent::Insert | RowEvent::Update => {
            let Some(new) = raw.new else {
                return Err(Error::Api(
                    "Row change payload is missing the new row".to_string(),
                ));
            };
            let row: Todo = serde_json::from_value(new)?;
            Ok(RowChange {
                event: raw.event_type,
                new: Some(row),
                old_id: None,
            })
        }
        RowEvent::Delete => {
            let Some(id) = raw.old.and_then(|old| old.id) else {
                return Err(Error::Api(
                    "Delete payload is missing the old row id".to_string(),
                ));
            };
            Ok(RowChange {
                event: RowEvent::Delete,
                new: None,
                old_id: Some(id),
            })
        }
    }
}

/// Drain raw payloads from the transport into the service until the
/// sender side closes.
///
/// Malformed payloads are logged and dropped; one bad event must not tear
/// down the feed.
pub async fn run_change_feed<S: TodoStore>(
    service: Arc<TodoService<S>>,
    mut payloads: mpsc::Receiver<Value>,
) {
    while let Some(payload) = payloads.recv().await {
        match decode_change(&payload) {
            Ok(change) => service.apply_change(change).await,
            Err(error) => {
                tracing::warn!("Dropping malformed row change payload: {error}");
            }
        }
    }
    tracing::debug!("Row change feed closed");
}
