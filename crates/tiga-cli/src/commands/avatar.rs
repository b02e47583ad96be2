use std::path::Path;

use tiga_core::avatar::AvatarStorage;
use tiga_core::config::AppConfig;

use crate::commands::common::signed_in;
use crate::error::CliError;

/// Upload an avatar image and print its public URL.
pub async fn run_avatar(config: &AppConfig, file: &Path) -> Result<(), CliError> {
    let extension = file_extension(file)?;
    let bytes = std::fs::read(file)?;

    let (_auth, session) = signed_in(config).await?;
    let (url, anon_key) = config.supabase()?;
    let storage = AvatarStorage::new(&url, anon_key)?;

    let public_url = storage
        .upload(&session.access_token, &session.user.id, &extension, bytes)
        .await?;
    println!("Avatar uploaded: {public_url}");
    Ok(())
}

fn file_extension(file: &Path) -> Result<String, CliError> {
    file.extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::Config(format!(
                "Cannot tell the image type of `{}`; use a file extension like .png",
                file.display()
            ))
        })
}
