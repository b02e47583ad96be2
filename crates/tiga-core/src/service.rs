//! Todo service: optimistic mutations reconciled against the remote store.
//!
//! Every mutating operation runs the same state machine: propose the change
//! locally (capturing a rollback snapshot), commit exactly one remote
//! write, then reconcile by adopting the server row on success or restoring
//! the snapshot on failure. The cache lock is held only while state is
//! applied, never across the remote await, so realtime events interleave
//! through the same serialized queue.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::cache::TodoCache;
use crate::error::{Error, Result};
use crate::models::{Todo, TodoId};
use crate::realtime::{RowChange, RowEvent};
use crate::remote::{NewTodo, TodoPatch, TodoStore};
use crate::tasks::{set_task_completed, DocTask};

/// A short-lived, user-visible failure notification (the toast analogue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
}

/// Sink for user-visible notices emitted on rollback.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notice sink that only logs; the default for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNoticeSink;

impl NoticeSink for LogNoticeSink {
    fn notify(&self, notice: Notice) {
        tracing::warn!("{}", notice.message);
    }
}

/// Collecting sink for tests and UIs that drain notices themselves.
#[derive(Debug, Default)]
pub struct MemoryNoticeSink {
    notices: StdMutex<Vec<Notice>>,
}

impl MemoryNoticeSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain all notices collected so far.
    pub fn take(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}

impl NoticeSink for MemoryNoticeSink {
    fn notify(&self, notice: Notice) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push(notice);
        }
    }
}

/// Releases the single-submission latch when the operation finishes.
struct SubmitGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Client-side todo operations over a remote store
pub struct TodoService<S> {
    store: S,
    user_id: String,
    cache: Mutex<TodoCache>,
    notices: Arc<dyn NoticeSink>,
    submitting: AtomicBool,
}

impl<S: TodoStore> TodoService<S> {
    pub fn new(store: S, user_id: impl Into<String>, notices: Arc<dyn NoticeSink>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            cache: Mutex::new(TodoCache::new()),
            notices,
            submitting: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Bulk-fetch the user's rows and rebuild the cache from them.
    ///
    /// An auth failure here means the session is gone; callers redirect to
    /// sign-in rather than retrying.
    pub async fn refresh(&self) -> Result<usize> {
        let rows = self.store.list().await?;
        let mut cache = self.cache.lock().await;
        cache.replace_all(rows);
        Ok(cache.rows().len())
    }

    /// Current row list, newest first.
    pub async fn rows(&self) -> Vec<Todo> {
        self.cache.lock().await.rows().to_vec()
    }

    /// Derived document tasks, recomputed from the current rows.
    pub async fn doc_tasks(&self) -> Vec<DocTask> {
        self.cache.lock().await.doc_tasks()
    }

    pub async fn get(&self, id: TodoId) -> Option<Todo> {
        self.cache.lock().await.get(id).cloned()
    }

    /// Create a row: optimistic placeholder first, server row adopted after.
    pub async fn create(&self, new: NewTodo) -> Result<Todo> {
        let _guard = self.begin_submission()?;

        let (snapshot, placeholder_id) = {
            let mut cache = self.cache.lock().await;
            let snapshot = cache.snapshot();
            let placeholder_id = cache.insert_placeholder(draft_from_new(&new));
            (snapshot, placeholder_id)
        };

        match self.store.insert(&new).await {
            Ok(server_row) => {
                let mut cache = self.cache.lock().await;
                cache.adopt(placeholder_id, server_row.clone());
                Ok(server_row)
            }
            Err(error) => {
                let mut cache = self.cache.lock().await;
                cache.restore(snapshot);
                self.notices.notify(Notice {
                    message: format!("Could not create '{}': {error}", new.title),
                });
                Err(error)
            }
        }
    }

    /// Toggle checklist completion for a task row.
    pub async fn toggle_completed(&self, id: TodoId) -> Result<Todo> {
        let completed = {
            let cache = self.cache.lock().await;
            let row = cache.get(id).ok_or(Error::NotFound(id))?;
            !row.is_completed
        };
        self.commit_patch(id, TodoPatch::completed(completed), |todo| {
            todo.is_completed = completed;
        })
        .await
    }

    /// Set or clear the due date; the reminder timestamp moves with it.
    pub async fn set_due(&self, id: TodoId, due: Option<DateTime<Utc>>) -> Result<Todo> {
        self.commit_patch(id, TodoPatch::due(due, due), |todo| {
            todo.due_date = due;
            todo.reminder_at = due;
        })
        .await
    }

    /// Update title and/or content; the embedded-task cache follows content.
    pub async fn edit(
        &self,
        id: TodoId,
        title: Option<String>,
        content: Option<Option<String>>,
    ) -> Result<Todo> {
        let _guard = self.begin_submission()?;

        let mut patch = TodoPatch {
            title: title.clone(),
            content: content.clone(),
            ..TodoPatch::default()
        };
        if patch.is_empty() {
            return Err(Error::InvalidInput("Nothing to update".to_string()));
        }

        if content.is_some() {
            // Keep the persisted checkbox cache in step with the new body.
            let mut probe = Todo::draft(id, self.user_id.clone(), String::new());
            probe.content = content.clone().flatten();
            probe.refresh_embedded_tasks();
            patch.embedded_tasks = Some(probe.embedded_tasks);
        }

        let embedded = patch.embedded_tasks.clone();
        self.commit_patch_unlatched(id, patch, move |todo| {
            if let Some(title) = title {
                todo.title = title;
            }
            if let Some(content) = content {
                todo.content = content;
            }
            if let Some(embedded) = embedded {
                todo.embedded_tasks = embedded;
            }
        })
        .await
    }

    /// Toggle a checkbox line inside a document row.
    ///
    /// A stale line index (out of range, or no longer a task line) leaves
    /// the content unchanged and performs no remote write.
    pub async fn toggle_doc_task(
        &self,
        doc_id: TodoId,
        line_index: usize,
        completed: bool,
    ) -> Result<Todo> {
        let (current, updated) = {
            let cache = self.cache.lock().await;
            let row = cache.get(doc_id).ok_or(Error::NotFound(doc_id))?;
            if doc_id.is_placeholder() {
                return Err(Error::NotYetCreated(doc_id));
            }
            let content = row.content.clone().unwrap_or_default();
            let updated = set_task_completed(&content, line_index, completed);
            (row.clone(), updated)
        };

        if current.content.as_deref().unwrap_or_default() == updated {
            // Deliberate no-op: the index no longer names a task line.
            return Ok(current);
        }

        let mut probe = current;
        probe.content = Some(updated.clone());
        probe.refresh_embedded_tasks();
        let embedded = probe.embedded_tasks.clone();

        let patch = TodoPatch {
            content: Some(Some(updated.clone())),
            embedded_tasks: Some(embedded.clone()),
            ..TodoPatch::default()
        };
        self.commit_patch(doc_id, patch, move |todo| {
            todo.content = Some(updated);
            todo.embedded_tasks = embedded;
        })
        .await
    }

    /// Delete a row: removed locally first, restored on failure.
    pub async fn delete(&self, id: TodoId) -> Result<()> {
        if id.is_placeholder() {
            return Err(Error::NotYetCreated(id));
        }

        let (snapshot, title) = {
            let mut cache = self.cache.lock().await;
            let snapshot = cache.snapshot();
            let Some(removed) = cache.remove(id) else {
                return Err(Error::NotFound(id));
            };
            (snapshot, removed.title)
        };

        match self.store.delete(id).await {
            Ok(()) => Ok(()),
            Err(error) => {
                let mut cache = self.cache.lock().await;
                cache.restore(snapshot);
                self.notices.notify(Notice {
                    message: format!("Could not delete '{title}': {error}"),
                });
                Err(error)
            }
        }
    }

    /// Merge one server-pushed row change into the cache.
    pub async fn apply_change(&self, change: RowChange) {
        let mut cache = self.cache.lock().await;
        match change.event {
            RowEvent::Insert => {
                if let Some(row) = change.new {
                    if row.user_id != self.user_id {
                        tracing::warn!("Dropping realtime insert for foreign user");
                        return;
                    }
                    cache.apply_insert(row);
                }
            }
            RowEvent::Update => {
                if let Some(row) = change.new {
                    if row.user_id != self.user_id {
                        tracing::warn!("Dropping realtime update for foreign user");
                        return;
                    }
                    cache.apply_update(row);
                }
            }
            RowEvent::Delete => {
                if let Some(id) = change.old_id {
                    cache.apply_remove(id);
                }
            }
        }
    }

    /// Shared propose/commit/reconcile flow for single-row patches.
    async fn commit_patch(
        &self,
        id: TodoId,
        patch: TodoPatch,
        apply: impl FnOnce(&mut Todo),
    ) -> Result<Todo> {
        let _guard = self.begin_submission()?;
        self.commit_patch_unlatched(id, patch, apply).await
    }

    async fn commit_patch_unlatched(
        &self,
        id: TodoId,
        patch: TodoPatch,
        apply: impl FnOnce(&mut Todo),
    ) -> Result<Todo> {
        if id.is_placeholder() {
            return Err(Error::NotYetCreated(id));
        }

        let (snapshot, title) = {
            let mut cache = self.cache.lock().await;
            if cache.get(id).is_none() {
                return Err(Error::NotFound(id));
            }
            let snapshot = cache.snapshot();
            cache.update_with(id, apply);
            let title = cache.get(id).map(|row| row.title.clone()).unwrap_or_default();
            (snapshot, title)
        };

        match self.store.update(id, &patch).await {
            Ok(server_row) => {
                let mut cache = self.cache.lock().await;
                cache.adopt(id, server_row.clone());
                Ok(server_row)
            }
            Err(error) => {
                let mut cache = self.cache.lock().await;
                cache.restore(snapshot);
                self.notices.notify(Notice {
                    message: format!("Could not update '{title}': {error}"),
                });
                Err(error)
            }
        }
    }

    fn begin_submission(&self) -> Result<SubmitGuard<'_>> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return Err(Error::SubmissionInFlight);
        }
        Ok(SubmitGuard {
            flag: &self.submitting,
        })
    }
}

fn draft_from_new(new: &NewTodo) -> Todo {
    let mut draft = Todo::draft(TodoId::new(0), new.user_id.clone(), new.title.clone());
    draft.content = new.content.clone();
    draft.is_completed = new.is_completed;
    draft.is_document = new.is_document;
    draft.due_date = new.due_date;
    draft.reminder_at = new.reminder_at;
    draft.folder_id = new.folder_id;
    draft.refresh_embedded_tasks();
    draft
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicI64;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    use super::*;

    /// In-memory stand-in for the remote table.
    #[derive(Default)]
    struct MemoryStoreInner {
        rows: StdMutex<Vec<Todo>>,
        next_id: AtomicI64,
        fail_writes: AtomicBool,
        gate: Option<Notify>,
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        inner: Arc<MemoryStoreInner>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self::default()
        }

        fn gated() -> Self {
            Self {
                inner: Arc::new(MemoryStoreInner {
                    gate: Some(Notify::new()),
                    ..MemoryStoreInner::default()
                }),
            }
        }

        fn fail_writes(&self, value: bool) {
            self.inner.fail_writes.store(value, Ordering::SeqCst);
        }

        fn open_gate(&self) {
            if let Some(gate) = &self.inner.gate {
                gate.notify_one();
            }
        }

        fn seed(&self, rows: Vec<Todo>) {
            let max_id = rows.iter().map(|row| row.id.raw()).max().unwrap_or(0);
            self.inner.next_id.store(max_id, Ordering::SeqCst);
            *self.inner.rows.lock().unwrap() = rows;
        }

        async fn wait_at_gate(&self) {
            if let Some(gate) = &self.inner.gate {
                gate.notified().await;
            }
        }

        fn check_write(&self) -> Result<()> {
            if self.inner.fail_writes.load(Ordering::SeqCst) {
                return Err(Error::Api("simulated write failure (500)".to_string()));
            }
            Ok(())
        }
    }

    impl TodoStore for MemoryStore {
        async fn list(&self) -> Result<Vec<Todo>> {
            Ok(self.inner.rows.lock().unwrap().clone())
        }

        async fn insert(&self, new: &NewTodo) -> Result<Todo> {
            self.wait_at_gate().await;
            self.check_write()?;
            let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let mut row = Todo::draft(TodoId::new(id), new.user_id.clone(), new.title.clone());
            row.content = new.content.clone();
            row.is_completed = new.is_completed;
            row.is_document = new.is_document;
            row.due_date = new.due_date;
            row.reminder_at = new.reminder_at;
            row.folder_id = new.folder_id;
            self.inner.rows.lock().unwrap().insert(0, row.clone());
            Ok(row)
        }

        async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
            self.check_write()?;
            let mut rows = self.inner.rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|row| row.id == id)
                .ok_or(Error::NotFound(id))?;
            if let Some(title) = &patch.title {
                row.title = title.clone();
            }
            if let Some(content) = &patch.content {
                row.content = content.clone();
            }
            if let Some(completed) = patch.is_completed {
                row.is_completed = completed;
            }
            if let Some(due_date) = patch.due_date {
                row.due_date = due_date;
            }
            if let Some(reminder_at) = patch.reminder_at {
                row.reminder_at = reminder_at;
            }
            if let Some(embedded) = &patch.embedded_tasks {
                row.embedded_tasks = embedded.clone();
            }
            if let Some(folder_id) = patch.folder_id {
                row.folder_id = folder_id;
            }
            Ok(row.clone())
        }

        async fn delete(&self, id: TodoId) -> Result<()> {
            self.check_write()?;
            let mut rows = self.inner.rows.lock().unwrap();
            let index = rows
                .iter()
                .position(|row| row.id == id)
                .ok_or(Error::NotFound(id))?;
            rows.remove(index);
            Ok(())
        }
    }

    fn service_with(
        store: MemoryStore,
    ) -> (Arc<TodoService<MemoryStore>>, Arc<MemoryNoticeSink>) {
        let notices = Arc::new(MemoryNoticeSink::new());
        let service = Arc::new(TodoService::new(store, "user-1", notices.clone()));
        (service, notices)
    }

    fn seeded_row(id: i64, title: &str) -> Todo {
        Todo::draft(TodoId::new(id), "user-1", title)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_success_adopts_server_row() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(41, "existing")]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        let created = service
            .create(NewTodo::task("user-1", "Buy milk"))
            .await
            .unwrap();

        assert_eq!(created.id, TodoId::new(42));
        let rows = service.rows().await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, TodoId::new(42));
        assert_eq!(rows[0].title, "Buy milk");
        assert!(rows.iter().all(|row| !row.id.is_placeholder()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_shows_placeholder_while_in_flight() {
        let store = MemoryStore::gated();
        let (service, _notices) = service_with(store.clone());
        service.refresh().await.unwrap();

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.create(NewTodo::task("user-1", "Buy milk")).await })
        };

        // Wait for the optimistic insert to land, then inspect mid-flight.
        let mut rows = service.rows().await;
        while rows.is_empty() {
            tokio::task::yield_now().await;
            rows = service.rows().await;
        }
        assert_eq!(rows.len(), 1);
        assert!(rows[0].id.is_placeholder());
        assert_eq!(rows[0].title, "Buy milk");

        store.open_gate();
        let created = pending.await.unwrap().unwrap();
        assert_eq!(created.id, TodoId::new(1));
        let rows = service.rows().await;
        assert!(rows.iter().all(|row| !row.id.is_placeholder()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn create_failure_rolls_back_and_notifies() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "kept")]);
        let (service, notices) = service_with(store.clone());
        service.refresh().await.unwrap();
        let before = service.rows().await;

        store.fail_writes(true);
        let error = service
            .create(NewTodo::task("user-1", "Buy milk"))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Api(_)));

        assert_eq!(service.rows().await, before);
        let emitted = notices.take();
        assert_eq!(emitted.len(), 1);
        assert!(emitted[0].message.contains("Buy milk"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_failure_restores_prior_state() {
        let store = MemoryStore::new();
        let mut done = seeded_row(2, "done already");
        done.is_completed = true;
        store.seed(vec![seeded_row(1, "open"), done]);
        let (service, notices) = service_with(store.clone());
        service.refresh().await.unwrap();

        store.fail_writes(true);
        service.toggle_completed(TodoId::new(1)).await.unwrap_err();

        let rows = service.rows().await;
        assert!(!rows.iter().find(|row| row.id == TodoId::new(1)).unwrap().is_completed);
        assert!(rows.iter().find(|row| row.id == TodoId::new(2)).unwrap().is_completed);
        assert_eq!(notices.take().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_success_flips_and_adopts() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "task")]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        let updated = service.toggle_completed(TodoId::new(1)).await.unwrap();
        assert!(updated.is_completed);

        let back = service.toggle_completed(TodoId::new(1)).await.unwrap();
        assert!(!back.is_completed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn placeholder_rows_reject_mutations() {
        let store = MemoryStore::gated();
        let (service, _notices) = service_with(store.clone());
        service.refresh().await.unwrap();

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.create(NewTodo::task("user-1", "pending")).await })
        };
        let mut rows = service.rows().await;
        while rows.is_empty() {
            tokio::task::yield_now().await;
            rows = service.rows().await;
        }
        let placeholder_id = rows[0].id;

        let error = service.delete(placeholder_id).await.unwrap_err();
        assert!(matches!(error, Error::NotYetCreated(_)));

        store.open_gate();
        pending.await.unwrap().unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn second_create_is_rejected_while_one_is_in_flight() {
        let store = MemoryStore::gated();
        let (service, _notices) = service_with(store.clone());
        service.refresh().await.unwrap();

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.create(NewTodo::task("user-1", "first")).await })
        };
        let mut rows = service.rows().await;
        while rows.is_empty() {
            tokio::task::yield_now().await;
            rows = service.rows().await;
        }

        let error = service
            .create(NewTodo::task("user-1", "second"))
            .await
            .unwrap_err();
        assert!(matches!(error, Error::SubmissionInFlight));
        assert_eq!(service.rows().await.len(), 1);

        store.open_gate();
        pending.await.unwrap().unwrap();
        assert_eq!(service.rows().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_failure_restores_row() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "keep me")]);
        let (service, notices) = service_with(store.clone());
        service.refresh().await.unwrap();

        store.fail_writes(true);
        service.delete(TodoId::new(1)).await.unwrap_err();

        assert_eq!(service.rows().await.len(), 1);
        assert_eq!(notices.take().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn set_due_updates_both_timestamps() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "dated")]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        let due = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let updated = service.set_due(TodoId::new(1), Some(due)).await.unwrap();
        assert_eq!(updated.due_date, Some(due));
        assert_eq!(updated.reminder_at, Some(due));

        let cleared = service.set_due(TodoId::new(1), None).await.unwrap();
        assert_eq!(cleared.due_date, None);
        assert_eq!(cleared.reminder_at, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_doc_task_rewrites_content_and_cache() {
        let store = MemoryStore::new();
        let mut doc = seeded_row(1, "Plan");
        doc.is_document = true;
        doc.content = Some("- [ ] a\n- [x] b".to_string());
        store.seed(vec![doc]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        let updated = service
            .toggle_doc_task(TodoId::new(1), 0, true)
            .await
            .unwrap();
        assert_eq!(updated.content.as_deref(), Some("- [x] a\n- [x] b"));
        let embedded = updated.embedded_tasks.unwrap();
        assert!(embedded[0].is_completed);

        let doc_tasks = service.doc_tasks().await;
        assert!(doc_tasks.iter().all(|task| task.is_completed));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_doc_task_with_stale_index_is_a_no_op() {
        let store = MemoryStore::new();
        let mut doc = seeded_row(1, "Plan");
        doc.is_document = true;
        doc.content = Some("- [ ] only".to_string());
        store.seed(vec![doc.clone()]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        let unchanged = service
            .toggle_doc_task(TodoId::new(1), 7, true)
            .await
            .unwrap();
        assert_eq!(unchanged.content, doc.content);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn toggle_doc_task_is_rejected_while_a_create_is_in_flight() {
        let store = MemoryStore::gated();
        let mut doc = seeded_row(1, "Plan");
        doc.is_document = true;
        doc.content = Some("- [ ] a".to_string());
        store.seed(vec![doc]);
        let (service, _notices) = service_with(store.clone());
        service.refresh().await.unwrap();

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.create(NewTodo::task("user-1", "busy")).await })
        };
        let mut rows = service.rows().await;
        while rows.len() < 2 {
            tokio::task::yield_now().await;
            rows = service.rows().await;
        }

        let error = service
            .toggle_doc_task(TodoId::new(1), 0, true)
            .await
            .unwrap_err();
        assert!(matches!(error, Error::SubmissionInFlight));

        store.open_gate();
        pending.await.unwrap().unwrap();

        // Latch released with the create; the toggle goes through now.
        let updated = service
            .toggle_doc_task(TodoId::new(1), 0, true)
            .await
            .unwrap();
        assert_eq!(updated.content.as_deref(), Some("- [x] a"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn edit_refreshes_embedded_task_cache() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "doc")]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        let updated = service
            .edit(
                TodoId::new(1),
                None,
                Some(Some("- [ ] new task\ntext".to_string())),
            )
            .await
            .unwrap();
        let embedded = updated.embedded_tasks.unwrap();
        assert_eq!(embedded.len(), 1);
        assert_eq!(embedded[0].text, "new task");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn realtime_changes_merge_into_cache() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "mine")]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        service
            .apply_change(RowChange {
                event: RowEvent::Insert,
                new: Some(seeded_row(2, "from another device")),
                old_id: None,
            })
            .await;
        assert_eq!(service.rows().await.len(), 2);

        let mut renamed = seeded_row(1, "renamed elsewhere");
        renamed.is_completed = true;
        service
            .apply_change(RowChange {
                event: RowEvent::Update,
                new: Some(renamed),
                old_id: None,
            })
            .await;
        let rows = service.rows().await;
        let row = rows.iter().find(|row| row.id == TodoId::new(1)).unwrap();
        assert_eq!(row.title, "renamed elsewhere");

        service
            .apply_change(RowChange {
                event: RowEvent::Delete,
                new: None,
                old_id: Some(TodoId::new(2)),
            })
            .await;
        assert_eq!(service.rows().await.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn realtime_insert_for_foreign_user_is_dropped() {
        let store = MemoryStore::new();
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        service
            .apply_change(RowChange {
                event: RowEvent::Insert,
                new: Some(Todo::draft(TodoId::new(9), "someone-else", "not mine")),
                old_id: None,
            })
            .await;
        assert!(service.rows().await.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn realtime_update_for_foreign_user_is_dropped() {
        let store = MemoryStore::new();
        store.seed(vec![seeded_row(1, "mine")]);
        let (service, _notices) = service_with(store);
        service.refresh().await.unwrap();

        service
            .apply_change(RowChange {
                event: RowEvent::Update,
                new: Some(Todo::draft(TodoId::new(1), "someone-else", "hijacked")),
                old_id: None,
            })
            .await;

        let rows = service.rows().await;
        assert_eq!(rows[0].title, "mine");
    }
}
