//! Runtime configuration for client apps.
//!
//! All values are safe-to-ship public endpoints and keys read from the
//! environment (a `.env` file in development). Secret credentials never
//! live here; sessions go through the platform's secure storage.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::non_empty_trimmed;

pub const ENV_SUPABASE_URL: &str = "TIGA_SUPABASE_URL";
pub const ENV_SUPABASE_ANON_KEY: &str = "TIGA_SUPABASE_ANON_KEY";
pub const ENV_API_BASE_URL: &str = "TIGA_API_BASE_URL";
pub const ENV_DEV_EMAIL: &str = "TIGA_DEV_EMAIL";
pub const ENV_DEV_PASSWORD: &str = "TIGA_DEV_PASSWORD";

/// Endpoint configuration discovered from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub dev_email: Option<String>,
    #[serde(default)]
    pub dev_password: Option<String>,
}

impl AppConfig {
    /// Read configuration from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            supabase_url: non_empty_trimmed(lookup(ENV_SUPABASE_URL)),
            supabase_anon_key: non_empty_trimmed(lookup(ENV_SUPABASE_ANON_KEY)),
            api_base_url: non_empty_trimmed(lookup(ENV_API_BASE_URL)),
            dev_email: non_empty_trimmed(lookup(ENV_DEV_EMAIL)),
            dev_password: non_empty_trimmed(lookup(ENV_DEV_PASSWORD)),
        }
    }

    /// Backend URL and anon key, required together.
    pub fn supabase(&self) -> Result<(String, String)> {
        match (self.supabase_url.clone(), self.supabase_anon_key.clone()) {
            (Some(url), Some(anon_key)) => Ok((url, anon_key)),
            _ => Err(Error::InvalidInput(format!(
                "Both {ENV_SUPABASE_URL} and {ENV_SUPABASE_ANON_KEY} must be set"
            ))),
        }
    }

    /// App service base URL for registration and the timeline.
    pub fn api_base_url(&self) -> Result<String> {
        self.api_base_url.clone().ok_or_else(|| {
            Error::InvalidInput(format!("{ENV_API_BASE_URL} must be set"))
        })
    }

    /// Development auto-login credentials: both set, or neither.
    ///
    /// A half-configured pair is a misconfiguration, not a silent fallback
    /// to the interactive prompt.
    pub fn dev_credentials(&self) -> Result<Option<(String, String)>> {
        match (self.dev_email.clone(), self.dev_password.clone()) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => Ok(Some((email, password))),
            _ => Err(Error::InvalidInput(format!(
                "{ENV_DEV_EMAIL} and {ENV_DEV_PASSWORD} must be set together"
            ))),
        }
    }
}
