//! Shared plumbing for command handlers.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tiga_core::auth::AuthSession;
use tiga_core::config::AppConfig;
use tiga_core::remote::PostgrestClient;
use tiga_core::service::{Notice, NoticeSink, TodoService};
use tiga_core::Todo;

use crate::auth::AuthService;
use crate::error::CliError;

/// Notice sink that surfaces rollbacks on stderr.
pub struct StderrNoticeSink;

impl NoticeSink for StderrNoticeSink {
    fn notify(&self, notice: Notice) {
        eprintln!("Warning: {}", notice.message);
    }
}

/// Restore the stored session, falling back to dev auto-login.
pub async fn signed_in(config: &AppConfig) -> Result<(AuthService, AuthSession), CliError> {
    let auth = AuthService::from_config(config)?;

    if let Some(session) = auth
        .restore_session()
        .await
        .map_err(|error| CliError::Auth(error.to_string()))?
    {
        return Ok((auth, session));
    }

    if let Some((email, password)) = config.dev_credentials()? {
        tracing::info!("Signing in with development credentials");
        let session = auth
            .sign_in(&email, &password)
            .await
            .map_err(|error| CliError::Auth(error.to_string()))?;
        return Ok((auth, session));
    }

    Err(CliError::NotSignedIn)
}

/// Build a refreshed todo service for the signed-in user.
pub async fn todo_service(
    config: &AppConfig,
    session: &AuthSession,
) -> Result<TodoService<PostgrestClient>, CliError> {
    let (url, anon_key) = config.supabase()?;
    let store = PostgrestClient::new(&url, anon_key, session.access_token.clone())?;
    let service = TodoService::new(store, session.user.id.clone(), Arc::new(StderrNoticeSink));
    service.refresh().await?;
    Ok(service)
}

/// Rest client for folder operations, sharing the todo table's auth.
pub fn rest_client(
    config: &AppConfig,
    session: &AuthSession,
) -> Result<PostgrestClient, CliError> {
    let (url, anon_key) = config.supabase()?;
    Ok(PostgrestClient::new(
        &url,
        anon_key,
        session.access_token.clone(),
    )?)
}

/// Join word arguments into a trimmed title.
pub fn resolve_title(parts: &[String]) -> Result<String, CliError> {
    let joined = parts.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyTitle)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a due date argument: RFC 3339, or a bare date at midnight UTC.
pub fn parse_due(raw: &str) -> Result<DateTime<Utc>, CliError> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| CliError::InvalidDate(raw.to_string()))
}

#[derive(Debug, Serialize)]
pub struct TodoListItem {
    pub id: i64,
    pub title: String,
    pub is_completed: bool,
    pub is_document: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub folder_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

pub fn todo_to_list_item(todo: &Todo) -> TodoListItem {
    TodoListItem {
        id: todo.id.raw(),
        title: todo.title.clone(),
        is_completed: todo.is_completed,
        is_document: todo.is_document,
        due_date: todo.due_date,
        folder_id: todo.folder_id,
        created_at: todo.created_at,
    }
}

/// One aligned terminal line per row.
pub fn format_todo_lines(todos: &[Todo]) -> Vec<String> {
    let now = Utc::now();
    todos
        .iter()
        .map(|todo| {
            let marker = if todo.is_document {
                "doc"
            } else if todo.is_completed {
                "[x]"
            } else {
                "[ ]"
            };
            let title = truncate_title(&todo.title, 40);
            match todo.due_date {
                Some(due) => format!(
                    "{:>6}  {marker}  {title:<40}  {}",
                    todo.id.raw(),
                    format_due(due, now)
                ),
                None => format!("{:>6}  {marker}  {title}", todo.id.raw()),
            }
        })
        .collect()
}

pub fn truncate_title(title: &str, max_chars: usize) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

/// Human-friendly due distance, both directions.
pub fn format_due(due: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = due - now;
    let minutes = diff.num_minutes();

    if minutes.abs() < 60 {
        return if minutes >= 0 {
            "due now".to_string()
        } else {
            "overdue".to_string()
        };
    }

    let hours = diff.num_hours();
    if hours.abs() < 24 {
        return if hours > 0 {
            format!("due in {hours}h")
        } else {
            format!("{}h overdue", -hours)
        };
    }

    let days = diff.num_days();
    if days > 0 {
        format!("due in {days}d")
    } else {
        format!("{}d overdue", -days)
    }
}

/// Open $VISUAL/$EDITOR on the initial content and return the edited text.
pub fn capture_editor_input_with_initial(initial_content: &str) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_edit_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let edited = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    let trimmed = edited.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Fallback for editor commands with args, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_edit_file_path() -> PathBuf {
    env::temp_dir().join(format!(
        "tiga-edit-{}-{}.md",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ))
}
