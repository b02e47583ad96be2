use std::str::FromStr;

use serde::Serialize;
use tiga_core::config::AppConfig;
use tiga_core::models::{Folder, FolderColor};
use tiga_core::remote::{FolderStore, NewFolder};

use crate::cli::FolderCommands;
use crate::commands::common::{rest_client, signed_in};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct FolderListItem {
    id: i64,
    name: String,
    color: FolderColor,
    is_for_document: bool,
}

pub async fn run_folder(config: &AppConfig, command: FolderCommands) -> Result<(), CliError> {
    let (_auth, session) = signed_in(config).await?;
    let client = rest_client(config, &session)?;

    match command {
        FolderCommands::List { docs, json } => {
            let folders = client.list_folders(docs).await?;
            if json {
                let items = folders.iter().map(folder_to_item).collect::<Vec<_>>();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for folder in &folders {
                    println!("{:>6}  {:<8}  {}", folder.id, folder.color.as_str(), folder.name);
                }
            }
        }
        FolderCommands::Add { name, color, docs } => {
            let color = FolderColor::from_str(&color)
                .map_err(|_| CliError::UnknownColor(color.clone()))?;
            let created = client
                .insert_folder(&NewFolder {
                    user_id: session.user.id.clone(),
                    name,
                    color,
                    is_for_document: docs,
                })
                .await?;
            println!("{}", created.id);
        }
        FolderCommands::Delete { id } => {
            client.delete_folder(id).await?;
            println!("{id}");
        }
    }

    Ok(())
}

fn folder_to_item(folder: &Folder) -> FolderListItem {
    FolderListItem {
        id: folder.id,
        name: folder.name.clone(),
        color: folder.color,
        is_for_document: folder.is_for_document,
    }
}
