use tiga_core::config::AppConfig;
use tiga_core::remote::NewTodo;

use crate::commands::common::{parse_due, resolve_title, signed_in, todo_service};
use crate::error::CliError;

pub async fn run_add(
    config: &AppConfig,
    title_parts: &[String],
    due: Option<&str>,
    folder: Option<i64>,
    doc: bool,
    content: Option<&str>,
) -> Result<(), CliError> {
    let title = resolve_title(title_parts)?;

    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;

    let mut new = if doc {
        NewTodo::document(&session.user.id, &title, content.unwrap_or_default())
    } else {
        let mut new = NewTodo::task(&session.user.id, &title);
        new.content = content.map(ToString::to_string);
        new
    };
    if let Some(raw) = due {
        let due = parse_due(raw)?;
        new.due_date = Some(due);
        new.reminder_at = Some(due);
    }
    new.folder_id = folder;

    let created = service.create(new).await?;
    println!("{}", created.id);
    Ok(())
}
