use tiga_core::api::ApiClient;
use tiga_core::config::AppConfig;

use crate::commands::common::signed_in;
use crate::error::CliError;

pub async fn run_timeline(config: &AppConfig, limit: usize, as_json: bool) -> Result<(), CliError> {
    let (_auth, session) = signed_in(config).await?;
    let api = ApiClient::new(&config.api_base_url()?)?;

    let entries: Vec<_> = api
        .timeline(&session.access_token)
        .await?
        .into_iter()
        .take(limit)
        .collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            let title = entry.metadata.title.as_deref().unwrap_or("(untitled)");
            println!(
                "{}  {:<9}  #{:<6}  {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.action_type.label(),
                entry.todo_id,
                title
            );
        }
    }

    Ok(())
}
