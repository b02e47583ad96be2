//! Profile avatar uploads to the backend's storage bucket.
//!
//! Avatars live in a public `avatars` bucket; object names embed the user
//! id and an upload timestamp so a new upload never collides with or
//! overwrites the old object mid-download.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

use crate::error::{Error, Result};
use crate::util::{clip_error_body, has_http_scheme, now_unix};

const BUCKET: &str = "avatars";

#[derive(Clone)]
pub struct AvatarStorage {
    storage_url: String,
    anon_key: String,
    client: Client,
}

impl AvatarStorage {
    pub fn new(project_url: &str, anon_key: impl Into<String>) -> Result<Self> {
        let storage_url = normalize_storage_url(project_url)?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(Error::InvalidInput(
                "Backend anon key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            storage_url,
            anon_key,
            client: Client::builder().build()?,
        })
    }

    /// Upload avatar bytes and return the public URL of the new object.
    pub async fn upload(
        &self,
        access_token: &str,
        user_id: &str,
        extension: &str,
        bytes: Vec<u8>,
    ) -> Result<String> {
        let content_type = content_type_for(extension)?;
        if bytes.is_empty() {
            return Err(Error::InvalidInput(
                "Avatar file must not be empty".to_string(),
            ));
        }

        let object = object_name(user_id, extension);
        let response = self
            .client
            .post(format!("{}/object/{BUCKET}/{object}", self.storage_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .header(CONTENT_TYPE, HeaderValue::from_static(content_type))
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(storage_error(status, &body));
        }

        Ok(self.public_url(&object))
    }

    /// Public download URL for an object in the avatar bucket.
    #[must_use]
    pub fn public_url(&self, object: &str) -> String {
        format!("{}/object/public/{BUCKET}/{object}", self.storage_url)
    }
}

fn object_name(user_id: &str, extension: &str) -> String {
    format!(
        "{user_id}-{}.{}",
        now_unix(),
        extension.trim_start_matches('.').to_ascii_lowercase()
    )
}

/// Content type for the supported raster image extensions.
fn content_type_for(extension: &str) -> Result<&'static str> {
    match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        other => Err(Error::InvalidInput(format!(
            "Unsupported avatar file type: .{other}"
        ))),
    }
}

/// Normalize a project URL to its `/storage/v1` root.
pub fn normalize_storage_url(url: &str) -> Result<String> {
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
    if trimmed.ends_with("/storage/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/storage/v1"))
    }
}

fn storage_error(status: StatusCode, body: &str) -> Error {
    let message = {
        let trimmed = clip_error_body(body);
        if trimmed.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("{trimmed} ({})", status.as_u16())
        }
    };
    if status == StatusCode::UNAUTHORIZED {
        Error::Unauthenticated(message)
    } else {
        Error::Api(message)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_storage_url_appends_storage_path() {
        let normalized = normalize_storage_url("https://demo.supabase.co").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/storage/v1");
    }

    #[test]
    fn object_names_embed_user_and_lowercase_extension() {
        let name = object_name("user-1", ".PNG");
        assert!(name.starts_with("user-1-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn content_type_covers_supported_extensions() {
        assert_eq!(content_type_for("png").unwrap(), "image/png");
        assert_eq!(content_type_for(".JPEG").unwrap(), "image/jpeg");
        assert!(content_type_for("svg").is_err());
        assert!(content_type_for("").is_err());
    }

    #[test]
    fn public_url_points_at_the_public_route() {
        let storage = AvatarStorage::new("https://demo.supabase.co", "anon").unwrap();
        assert_eq!(
            storage.public_url("user-1-1700000000.png"),
            "https://demo.supabase.co/storage/v1/object/public/avatars/user-1-1700000000.png"
        );
    }
}
