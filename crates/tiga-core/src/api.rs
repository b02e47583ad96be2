//! Client for the app's own REST API.
//!
//! Registration and the activity timeline live on a small first-party
//! service, separate from the hosted Supabase backend. Timeline entries
//! are written server-side as todos change; this client only registers
//! accounts and reads the log back.

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::ActivityEntry;
use crate::util::{clip_error_body, has_http_scheme};

/// Registration payload for `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUser {
    pub nickname: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_api_url(base_url)?;
        Ok(Self {
            base_url,
            client: Client::builder().build()?,
        })
    }

    /// Create an account on the app service.
    ///
    /// Runs alongside (not instead of) auth sign-up; the service keeps its
    /// own user record for timeline attribution.
    pub async fn register(&self, user: &RegisterUser) -> Result<()> {
        if user.nickname.trim().is_empty() {
            return Err(Error::InvalidInput("Nickname is required".to_string()));
        }
        if user.email.trim().is_empty() {
            return Err(Error::InvalidInput("Email is required".to_string()));
        }
        if user.password.trim().is_empty() {
            return Err(Error::InvalidInput("Password is required".to_string()));
        }

        let request = self
            .client
            .post(format!("{}/users/register", self.base_url))
            .json(user);
        self.send_empty(request).await
    }

    /// Fetch the signed-in user's activity log, newest first.
    pub async fn timeline(&self, access_token: &str) -> Result<Vec<ActivityEntry>> {
        let request = self
            .client
            .get(format!("{}/timeline/", self.base_url))
            .bearer_auth(access_token)
            .header(ACCEPT, "application/json");

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(response.json::<Vec<ActivityEntry>>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }
        Ok(())
    }
}

/// Normalize the service base URL: scheme required, no trailing slash.
pub fn normalize_api_url(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !has_http_scheme(trimmed) {
        return Err(Error::InvalidInput(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    detail: Option<String>,
    error: Option<String>,
}

fn api_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|payload| payload.message.or(payload.detail).or(payload.error))
        .map_or_else(
            || {
                let trimmed = clip_error_body(body);
                if trimmed.is_empty() {
                    format!("HTTP {}", status.as_u16())
                } else {
                    format!("{trimmed} ({})", status.as_u16())
                }
            },
            |message| format!("{} ({})", message.trim(), status.as_u16()),
        );

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
    fn normalize_api_url_strips_trailing_slash() {
        let normalized = normalize_api_url("https://api.tiga.app/ ").unwrap();
        assert_eq!(normalized, "https://api.tiga.app");
    }

    #[test]
    fn normalize_api_url_rejects_missing_scheme() {
        assert!(normalize_api_url("api.tiga.app").is_err());
        assert!(normalize_api_url("").is_err());
    }

    #[test]
    fn api_error_reads_structured_bodies() {
        let error = api_error(
            StatusCode::CONFLICT,
            r#"{"message":"Email already registered"}"#,
        );
        assert_eq!(
            error.to_string(),
            "API error: Email already registered (409)"
        );
    }

    #[test]
    fn unauthorized_timeline_maps_to_unauthenticated() {
        let error = api_error(StatusCode::UNAUTHORIZED, r#"{"detail":"Token expired"}"#);
        assert!(matches!(error, Error::Unauthenticated(_)));
    }

    #[test]
    fn register_payload_uses_wire_field_names() {
        let user = RegisterUser {
            nickname: "sam".to_string(),
            email: "sam@example.com".to_string(),
            password: "hunter2!".to_string(),
        };
        let encoded = serde_json::to_value(&user).unwrap();
        assert_eq!(encoded["nickname"], "sam");
        assert_eq!(encoded["email"], "sam@example.com");
        assert_eq!(encoded["password"], "hunter2!");
    }
}
