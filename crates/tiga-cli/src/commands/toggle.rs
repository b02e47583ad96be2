use tiga_core::config::AppConfig;
use tiga_core::{Error, TodoId};

use crate::commands::common::{signed_in, todo_service};
use crate::error::CliError;

/// `done` / `reopen`: settle a task's completion to the requested state.
pub async fn run_set_completed(
    config: &AppConfig,
    id: i64,
    completed: bool,
) -> Result<(), CliError> {
    let id = TodoId::new(id);
    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;

    let current = service.get(id).await.ok_or(Error::NotFound(id))?;
    if current.is_completed == completed {
        println!("{id}");
        return Ok(());
    }

    let updated = service.toggle_completed(id).await?;
    println!("{}", updated.id);
    Ok(())
}

/// `check` / `uncheck`: flip one checkbox line inside a document.
pub async fn run_set_doc_task(
    config: &AppConfig,
    id: i64,
    line: usize,
    completed: bool,
) -> Result<(), CliError> {
    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;

    let updated = service
        .toggle_doc_task(TodoId::new(id), line, completed)
        .await?;
    println!("{}", updated.id);
    Ok(())
}
