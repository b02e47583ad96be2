//! Client state cache for todo rows
//!
//! The remote store owns all durable state; this cache is a rebuildable,
//! single-owner projection of it. Every change funnels through the methods
//! here, so applications are totally ordered and each one stamps the row
//! with the next value of a monotonically increasing revision counter.
//! Optimistic writes and realtime pushes for the same row therefore apply
//! last-writer-wins in a well-defined order instead of racing.

use std::collections::HashMap;

use crate::models::{Todo, TodoId};
use crate::tasks::{collect_doc_tasks, DocTask};

/// Full-list snapshot captured before an optimistic mutation.
///
/// Restoring a snapshot is a complete rollback, not a field merge.
#[derive(Debug, Clone)]
pub struct CacheSnapshot {
    rows: Vec<Todo>,
    revisions: HashMap<TodoId, u64>,
}

/// In-memory ordered list of todo rows, newest first
#[derive(Debug, Default)]
pub struct TodoCache {
    rows: Vec<Todo>,
    revisions: HashMap<TodoId, u64>,
    next_placeholder: i64,
    clock: u64,
}

impl TodoCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[Todo] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&Todo> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Revision stamped on the last application that touched this row.
    #[must_use]
    pub fn revision(&self, id: TodoId) -> Option<u64> {
        self.revisions.get(&id).copied()
    }

    /// Whether any row still carries a placeholder id.
    #[must_use]
    pub fn has_pending_placeholders(&self) -> bool {
        self.rows.iter().any(|row| row.id.is_placeholder())
    }

    /// Replace the whole list with a fresh bulk fetch.
    pub fn replace_all(&mut self, rows: Vec<Todo>) {
        self.revisions.clear();
        self.rows = rows;
        let ids: Vec<TodoId> = self.rows.iter().map(|row| row.id).collect();
        for id in ids {
            self.stamp(id);
        }
    }

    /// Capture the current list for a later rollback.
    #[must_use]
    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            rows: self.rows.clone(),
            revisions: self.revisions.clone(),
        }
    }

    /// Restore a pre-mutation snapshot.
    ///
    /// The revision clock keeps advancing; only row state rolls back.
    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        self.rows = snapshot.rows;
        self.revisions = snapshot.revisions;
    }

    /// Insert an optimistic row at the front under a fresh placeholder id.
    pub fn insert_placeholder(&mut self, mut todo: Todo) -> TodoId {
        self.next_placeholder -= 1;
        let id = TodoId::new(self.next_placeholder);
        todo.id = id;
        self.rows.insert(0, todo);
        self.stamp(id);
        id
    }

    /// Adopt the authoritative server row for a local row.
    ///
    /// Full replacement, not a field merge. When a realtime insert already
    /// delivered the same server id while the create was in flight, that
    /// duplicate is collapsed so the server id appears exactly once.
    pub fn adopt(&mut self, local_id: TodoId, server_row: Todo) -> bool {
        let server_id = server_row.id;
        if server_id != local_id {
            if let Some(duplicate) = self.position(server_id) {
                self.rows.remove(duplicate);
            }
            self.revisions.remove(&local_id);
        }

        let Some(index) = self.position(local_id).or_else(|| self.position(server_id)) else {
            // Row vanished locally (e.g. removed by a realtime delete);
            // the server row is still authoritative, so insert it.
            self.rows.insert(0, server_row);
            self.stamp(server_id);
            return false;
        };

        self.rows[index] = server_row;
        self.stamp(server_id);
        true
    }

    /// Mutate a row in place, stamping a new revision.
    pub fn update_with(&mut self, id: TodoId, apply: impl FnOnce(&mut Todo)) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        apply(&mut self.rows[index]);
        self.stamp(id);
        true
    }

    /// Remove a row, returning it for rollback bookkeeping.
    pub fn remove(&mut self, id: TodoId) -> Option<Todo> {
        let index = self.position(id)?;
        self.revisions.remove(&id);
        Some(self.rows.remove(index))
    }

    /// Insert-if-absent, for externally-sourced (realtime) inserts.
    pub fn apply_insert(&mut self, row: Todo) -> bool {
        if self.position(row.id).is_some() {
            return false;
        }
        let id = row.id;
        self.rows.insert(0, row);
        self.stamp(id);
        true
    }

    /// Replace-by-id, for externally-sourced (realtime) updates.
    ///
    /// Unknown ids are ignored; the next bulk fetch is the source of truth
    /// for rows this client has never seen.
    pub fn apply_update(&mut self, row: Todo) -> bool {
        let Some(index) = self.position(row.id) else {
            return false;
        };
        let id = row.id;
        self.rows[index] = row;
        self.stamp(id);
        true
    }

    /// Remove-by-id, for externally-sourced (realtime) deletes.
    pub fn apply_remove(&mut self, id: TodoId) -> Option<Todo> {
        self.remove(id)
    }

    /// Recompute the document-task projection from scratch.
    #[must_use]
    pub fn doc_tasks(&self) -> Vec<DocTask> {
        collect_doc_tasks(&self.rows)
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    fn stamp(&mut self, id: TodoId) {
        self.clock += 1;
        self.revisions.insert(id, self.clock);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn row(id: i64, title: &str) -> Todo {
        Todo::draft(TodoId::new(id), "user-1", title)
    }

    #[test]
    fn placeholder_ids_decrease_and_insert_at_front() {
        let mut cache = TodoCache::new();
        cache.replace_all(vec![row(1, "existing")]);

        let first = cache.insert_placeholder(row(0, "a"));
        let second = cache.insert_placeholder(row(0, "b"));

        assert_eq!(first, TodoId::new(-1));
        assert_eq!(second, TodoId::new(-2));
        assert_eq!(cache.rows()[0].title, "b");
        assert_eq!(cache.rows()[2].title, "existing");
        assert!(cache.has_pending_placeholders());
    }

    #[test]
    fn adopt_replaces_placeholder_with_server_row() {
        let mut cache = TodoCache::new();
        let placeholder = cache.insert_placeholder(row(0, "Buy milk"));

        assert!(cache.adopt(placeholder, row(42, "Buy milk")));

        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].id, TodoId::new(42));
        assert!(!cache.has_pending_placeholders());
        assert!(cache.revision(placeholder).is_none());
        assert!(cache.revision(TodoId::new(42)).is_some());
    }

    #[test]
    fn adopt_collapses_duplicate_realtime_insert() {
        let mut cache = TodoCache::new();
        let placeholder = cache.insert_placeholder(row(0, "Buy milk"));
        // Realtime delivered the created row before our own response did.
        assert!(cache.apply_insert(row(42, "Buy milk")));
        assert_eq!(cache.rows().len(), 2);

        cache.adopt(placeholder, row(42, "Buy milk"));

        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].id, TodoId::new(42));
    }

    #[test]
    fn adopt_of_vanished_row_reinserts_server_row() {
        let mut cache = TodoCache::new();
        let placeholder = cache.insert_placeholder(row(0, "ghost"));
        cache.remove(placeholder);

        assert!(!cache.adopt(placeholder, row(7, "ghost")));
        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].id, TodoId::new(7));
    }

    #[test]
    fn snapshot_restore_is_a_full_rollback() {
        let mut cache = TodoCache::new();
        cache.replace_all(vec![row(1, "one"), row(2, "two")]);
        let snapshot = cache.snapshot();

        cache.update_with(TodoId::new(1), |todo| todo.is_completed = true);
        cache.remove(TodoId::new(2));
        assert_eq!(cache.rows().len(), 1);

        cache.restore(snapshot);
        assert_eq!(cache.rows().len(), 2);
        assert!(!cache.rows()[0].is_completed);
    }

    #[test]
    fn revisions_increase_monotonically_per_application() {
        let mut cache = TodoCache::new();
        cache.replace_all(vec![row(1, "one")]);
        let first = cache.revision(TodoId::new(1)).unwrap();

        cache.update_with(TodoId::new(1), |todo| todo.is_completed = true);
        let second = cache.revision(TodoId::new(1)).unwrap();
        assert!(second > first);

        cache.apply_update(row(1, "renamed"));
        let third = cache.revision(TodoId::new(1)).unwrap();
        assert!(third > second);
    }

    #[test]
    fn apply_insert_is_idempotent_by_id() {
        let mut cache = TodoCache::new();
        assert!(cache.apply_insert(row(5, "new")));
        assert!(!cache.apply_insert(row(5, "again")));
        assert_eq!(cache.rows().len(), 1);
        assert_eq!(cache.rows()[0].title, "new");
    }

    #[test]
    fn apply_update_ignores_unknown_rows() {
        let mut cache = TodoCache::new();
        assert!(!cache.apply_update(row(9, "never fetched")));
        assert!(cache.rows().is_empty());
    }

    #[test]
    fn doc_tasks_recompute_follows_row_changes() {
        let mut cache = TodoCache::new();
        let mut doc = row(1, "Plan");
        doc.is_document = true;
        doc.content = Some("- [ ] a".to_string());
        cache.replace_all(vec![doc]);
        assert_eq!(cache.doc_tasks().len(), 1);

        cache.update_with(TodoId::new(1), |todo| {
            todo.content = Some("- [ ] a\n- [x] b".to_string());
        });
        let doc_tasks = cache.doc_tasks();
        assert_eq!(doc_tasks.len(), 2);
        assert!(doc_tasks[1].is_completed);
    }
}
