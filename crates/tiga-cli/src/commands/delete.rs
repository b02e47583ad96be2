use tiga_core::config::AppConfig;
use tiga_core::TodoId;

use crate::commands::common::{signed_in, todo_service};
use crate::error::CliError;

pub async fn run_delete(config: &AppConfig, id: i64) -> Result<(), CliError> {
    let id = TodoId::new(id);
    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;

    service.delete(id).await?;
    println!("{id}");
    Ok(())
}
