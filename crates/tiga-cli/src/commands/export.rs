use std::path::{Path, PathBuf};

use chrono::Utc;
use tiga_core::config::AppConfig;
use tiga_core::export::{suggested_export_file_name, write_export};

use crate::commands::common::{signed_in, todo_service};
use crate::error::CliError;

pub async fn run_export(config: &AppConfig, output: Option<&Path>) -> Result<(), CliError> {
    let (_auth, session) = signed_in(config).await?;
    let service = todo_service(config, &session).await?;
    let rows = service.rows().await;

    let path = output.map_or_else(
        || PathBuf::from(suggested_export_file_name(Utc::now())),
        Path::to_path_buf,
    );
    write_export(&path, &rows)?;
    println!("{}", path.display());
    Ok(())
}
