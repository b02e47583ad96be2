//! Reminder scheduling for rows with a reminder timestamp.
//!
//! One timer per row, keyed by id. Scheduling a row that already has a
//! timer replaces it, so edits to a due date never leave a stale timer
//! behind. Timers are process-local; after a restart the caller
//! reschedules from the freshly fetched rows.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::models::{Todo, TodoId};

/// Delivery side of a fired reminder (desktop notification, print, test
/// collector).
pub trait Notifier: Send + Sync + 'static {
    fn remind(&self, todo: &Todo);
}

/// Notifier that only logs; the headless default.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn remind(&self, todo: &Todo) {
        tracing::info!("Reminder due: {}", todo.title);
    }
}

pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    timers: Arc<Mutex<HashMap<TodoId, JoinHandle<()>>>>,
}

impl ReminderScheduler {
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Arm (or re-arm) the timer for one row.
    ///
    /// Rows without a reminder, and reminders already in the past, clear
    /// any existing timer and arm nothing.
    pub fn schedule(&self, todo: &Todo) {
        self.cancel(todo.id);

        let Some(reminder_at) = todo.reminder_at else {
            return;
        };
        let Ok(delay) = (reminder_at - Utc::now()).to_std() else {
            tracing::debug!("Skipping past reminder for '{}'", todo.title);
            return;
        };

        let id = todo.id;
        let row = todo.clone();
        let notifier = self.notifier.clone();
        let timers = self.timers.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            notifier.remind(&row);
            if let Ok(mut timers) = timers.lock() {
                timers.remove(&id);
            }
        });

        if let Ok(mut timers) = self.timers.lock() {
            timers.insert(id, handle);
        }
    }

    /// Disarm the timer for one row, if any.
    pub fn cancel(&self, id: TodoId) {
        if let Ok(mut timers) = self.timers.lock() {
            if let Some(handle) = timers.remove(&id) {
                handle.abort();
            }
        }
    }

    /// Rebuild all timers from a fresh row list.
    pub fn sync(&self, rows: &[Todo]) {
        self.cancel_all();
        for row in rows {
            if row.reminder_at.is_some() {
                self.schedule(row);
            }
        }
    }

    pub fn cancel_all(&self) {
        if let Ok(mut timers) = self.timers.lock() {
            for (_, handle) in timers.drain() {
                handle.abort();
            }
        }
    }

    /// Number of currently armed timers.
    #[must_use]
    pub fn armed(&self) -> usize {
        self.timers.lock().map(|timers| timers.len()).unwrap_or(0)
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
