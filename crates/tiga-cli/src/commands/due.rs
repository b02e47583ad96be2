use tiga_core::config::AppConfig;
use tiga_core::TodoId;

use crate::commands::common::{parse_due, signed_in, todo_service};
use crate::error::CliError;

pub async fn run_due(
    config: &AppConfig,
    id: i64,
    date: Option<&str>,
    clear: bool,
) -> Result<(), CliError> {
    let id = TodoId::new(id);
    let due = if clear {
        None
    } else {
        match date {
            Some(raw) => Some(parse_due(raw)?),
            None => {
                return Err(CliError::Config(
                    "Provide a date, or pass --clear to remove the current one".to_string(),
                ))
            }
        }
    };

    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;

    let updated = service.set_due(id, due).await?;
    println!("{}", updated.id);
    Ok(())
}
