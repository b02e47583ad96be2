use tiga_core::config::AppConfig;
use tiga_core::{Error, TodoId};

use crate::commands::common::{
    capture_editor_input_with_initial, signed_in, todo_service,
};
use crate::error::CliError;

pub async fn run_edit(
    config: &AppConfig,
    id: i64,
    title: Option<String>,
    content: Option<String>,
) -> Result<(), CliError> {
    let id = TodoId::new(id);
    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;
    let current = service.get(id).await.ok_or(Error::NotFound(id))?;

    // With no flags, open the body in $EDITOR like a notes app would.
    let content = match (title.is_some(), content) {
        (_, Some(content)) => Some(Some(content)),
        (false, None) => {
            let initial = current.content.clone().unwrap_or_default();
            let Some(edited) = capture_editor_input_with_initial(&initial)? else {
                return Err(CliError::EmptyEditedContent);
            };
            if Some(edited.as_str()) == current.content.as_deref() {
                println!("{id}");
                return Ok(());
            }
            Some(Some(edited))
        }
        (true, None) => None,
    };

    let updated = service.edit(id, title, content).await?;
    println!("{}", updated.id);
    Ok(())
}
