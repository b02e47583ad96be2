//! Session helpers with secure keychain persistence.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use tiga_core::auth::{AuthClient, AuthResult, SessionPersistence, SignUpOutcome};
pub use tiga_core::auth::{AuthError, AuthSession, OAuthProvider};
use tiga_core::config::AppConfig;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "tiga-cli";

const SESSION_KEY: &str = "supabase_session";

#[derive(Clone)]
struct SessionStore {
    username: String,
}

impl SessionStore {
    fn new() -> Self {
        Self {
            username: SESSION_KEY.to_string(),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    #[cfg(not(test))]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let store = Self::test_store();
        let guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        if let Some(raw) = guard.get(&self.username) {
            Ok(Some(serde_json::from_str(raw)?))
        } else {
            Ok(None)
        }
    }

    #[cfg(not(test))]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&raw)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(())
    }

    #[cfg(test)]
    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let raw = serde_json::to_string(session)?;
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), raw);
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_session(&self) -> AuthResult<()> {
        let store = Self::test_store();
        let mut guard = store
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

/// Auth client bound to the keychain session store.
#[derive(Clone)]
pub struct AuthService {
    inner: AuthClient<SessionStore>,
}

impl AuthService {
    pub fn from_config(config: &AppConfig) -> Result<Self, crate::error::CliError> {
        let (url, anon_key) = config.supabase()?;
        Self::new(&url, &anon_key).map_err(|error| crate::error::CliError::Auth(error.to_string()))
    }

    pub fn new(url: impl AsRef<str>, anon_key: impl AsRef<str>) -> AuthResult<Self> {
        Ok(Self {
            inner: AuthClient::new(url, anon_key.as_ref().to_string(), SessionStore::new())?,
        })
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        self.inner.sign_in(email, password).await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpOutcome> {
        self.inner.sign_up(email, password).await
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        self.inner.restore_session().await
    }

    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        self.inner.sign_out(access_token).await
    }

    #[must_use]
    pub fn authorize_url(&self, provider: OAuthProvider, redirect_to: &str) -> String {
        self.inner.authorize_url(provider, redirect_to)
    }
}

pub fn load_stored_session() -> AuthResult<Option<AuthSession>> {
    SessionStore::new().load_session()
}

pub fn clear_stored_session() -> AuthResult<()> {
    SessionStore::new().clear_session()
}

#[cfg(test)]
mod tests {
    use tiga_core::auth::AuthUser;

    use super::*;

    fn sample_session(suffix: &str) -> AuthSession {
        AuthSession {
            access_token: format!("access-{suffix}"),
            refresh_token: format!("refresh-{suffix}"),
            expires_at: 1_900_000_000,
            user: AuthUser {
                id: format!("user-{suffix}"),
                email: None,
            },
        }
    }

    #[test]
    fn store_round_trips_and_clears_sessions() {
        let store = SessionStore::new();
        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());

        let session = sample_session("round-trip");
        store.save_session(&session).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }
}
