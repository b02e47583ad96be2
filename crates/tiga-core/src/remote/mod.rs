//! Remote row storage over the backend's PostgREST endpoint.
//!
//! Row-level security on the backend scopes every query to the bearer of
//! the access token; the client never filters by user itself. The store
//! traits are the seam the in-memory test store implements.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{EmbeddedTask, Folder, FolderColor, Todo, TodoId};
use crate::util::{clip_error_body, has_http_scheme};

/// Insert payload for a new todo row; id and `created_at` are server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTodo {
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub is_completed: bool,
    pub is_document: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,
}

impl NewTodo {
    /// A plain checklist task.
    #[must_use]
    pub fn task(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            content: None,
            is_completed: false,
            is_document: false,
            due_date: None,
            reminder_at: None,
            folder_id: None,
        }
    }

    /// A rich document row.
    #[must_use]
    pub fn document(
        user_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            content: Some(content.into()),
            is_document: true,
            ..Self::task(user_id, title)
        }
    }
}

impl From<&Todo> for NewTodo {
    fn from(todo: &Todo) -> Self {
        Self {
            user_id: todo.user_id.clone(),
            title: todo.title.clone(),
            content: todo.content.clone(),
            is_completed: todo.is_completed,
            is_document: todo.is_document,
            due_date: todo.due_date,
            reminder_at: todo.reminder_at,
            folder_id: todo.folder_id,
        }
    }
}

/// Partial update for a todo row.
///
/// Outer `None` means "leave the column alone"; `Some(None)` writes an
/// explicit null to clear a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_tasks: Option<Option<Vec<EmbeddedTask>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Option<i64>>,
}

impl TodoPatch {
    #[must_use]
    pub fn completed(value: bool) -> Self {
        Self {
            is_completed: Some(value),
            ..Self::default()
        }
    }

    /// Due date and reminder move together; clearing one clears both.
    #[must_use]
    pub fn due(due_date: Option<DateTime<Utc>>, reminder_at: Option<DateTime<Utc>>) -> Self {
        Self {
            due_date: Some(due_date),
            reminder_at: Some(reminder_at),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Insert payload for a new folder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewFolder {
    pub user_id: String,
    pub name: String,
    pub color: FolderColor,
    pub is_for_document: bool,
}

/// Remote storage operations for todo rows
#[allow(async_fn_in_trait)]
pub trait TodoStore {
    /// List the signed-in user's rows, newest first.
    async fn list(&self) -> Result<Vec<Todo>>;

    /// Insert one row and return the server's representation of it.
    async fn insert(&self, new: &NewTodo) -> Result<Todo>;

    /// Patch one row by id and return the server's representation.
    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo>;

    /// Delete one row by id.
    async fn delete(&self, id: TodoId) -> Result<()>;
}

/// Remote storage operations for folders
#[allow(async_fn_in_trait)]
pub trait FolderStore {
    /// List folders for one side of the task/document split.
    async fn list_folders(&self, is_for_document: bool) -> Result<Vec<Folder>>;

    async fn insert_folder(&self, new: &NewFolder) -> Result<Folder>;

    async fn delete_folder(&self, id: i64) -> Result<()>;
}

/// PostgREST client for the `todos` and `folders` tables
#[derive(Clone)]
pub struct PostgrestClient {
    rest_url: String,
    anon_key: String,
    access_token: String,
    client: Client,
}

impl PostgrestClient {
    pub fn new(
        project_url: &str,
        anon_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        let rest_url = normalize_rest_url(project_url)?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::InvalidInput(
                "Backend anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            access_token: access_token.into(),
            client: Client::builder().build()?,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{path}", self.rest_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
    }

    async fn send_rows<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(response.json::<Vec<T>>().await?)
    }

    async fn send_single<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T> {
        let mut rows = self
            .send_rows::<T>(request.header("Prefer", "return=representation"))
            .await?;
        if rows.is_empty() {
            return Err(Error::Api(
                "Write response did not include the affected row".to_string(),
            ));
        }
        Ok(rows.swap_remove(0))
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(())
    }
}

impl TodoStore for PostgrestClient {
    async fn list(&self) -> Result<Vec<Todo>> {
        self.send_rows(self.request(Method::GET, "todos?select=*&order=created_at.desc"))
            .await
    }

    async fn insert(&self, new: &NewTodo) -> Result<Todo> {
        self.send_single(
            self.request(Method::POST, "todos")
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(new),
        )
        .await
    }

    async fn update(&self, id: TodoId, patch: &TodoPatch) -> Result<Todo> {
        if id.is_placeholder() {
            return Err(Error::NotYetCreated(id));
        }
        self.send_single(
            self.request(Method::PATCH, &format!("todos?id=eq.{id}"))
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(patch),
        )
        .await
    }

    async fn delete(&self, id: TodoId) -> Result<()> {
        if id.is_placeholder() {
            return Err(Error::NotYetCreated(id));
        }
        self.send_empty(self.request(Method::DELETE, &format!("todos?id=eq.{id}")))
            .await
    }
}

impl FolderStore for PostgrestClient {
    async fn list_folders(&self, is_for_document: bool) -> Result<Vec<Folder>> {
        let path = format!(
            "folders?select=*&is_for_document=eq.{is_for_document}&order=created_at.desc"
        );
        self.send_rows(self.request(Method::GET, &path)).await
    }

    async fn insert_folder(&self, new: &NewFolder) -> Result<Folder> {
        self.send_single(
            self.request(Method::POST, "folders")
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .json(new),
        )
        .await
    }

    async fn delete_folder(&self, id: i64) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, &format!("folders?id=eq.{id}")))
            .await
    }
}

/// Normalize a project URL to its `/rest/v1` root.
pub fn normalize_rest_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "Backend URL must not be empty".to_string(),
        ));
    }
    if !has_http_scheme(trimmed) {
        return Err(Error::InvalidInput(
            "Backend URL must include http:// or https://".to_string(),
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

fn api_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<PostgrestErrorBody>(body)
        .ok()
        .and_then(|payload| payload.message.or(payload.details).or(payload.hint))
        .map_or_else(
            || {
                let trimmed = clip_error_body(body);
                if trimmed.is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    format!("{trimmed} ({})", status.as_u16())
                }
            },
            |message| format!("{} ({})", message.trim(), status.as_u16()),
        );

    if status == StatusCode::UNAUTHORIZED {
        Error::Unauthenticated(message)
    } else {
        Error::Api(message)
    }
}
