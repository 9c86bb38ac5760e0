//! Signed-in session, persisted twice: as a cookie in the shared jar (so
//! the proxy forwards it) and as a JSON file standing in for local storage.
//! Either copy is enough to restore the session.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::Result;
use crate::graphql::AuthPayload;
use crate::models::User;

pub const ACCESS_TOKEN_COOKIE: &str = "agriha_access_token";

#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: SecretString,
    pub refresh_token: Option<SecretString>,
    pub user: User,
}

impl From<AuthPayload> for Session {
    fn from(payload: AuthPayload) -> Self {
        Self {
            access_token: SecretString::from(payload.access_token),
            refresh_token: payload.refresh_token.map(SecretString::from),
            user: payload.user,
        }
    }
}

/// Broadcast to every component that cares about login state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    LoggedIn(User),
    LoggedOut,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    access_token: String,
    refresh_token: Option<String>,
    user: Option<User>,
}

pub struct SessionStore {
    storage_path: PathBuf,
    jar: Arc<Jar>,
    cookie_url: Url,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionStore {
    pub fn new(storage_path: PathBuf, jar: Arc<Jar>, cookie_url: Url) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            storage_path,
            jar,
            cookie_url,
            current: RwLock::new(None),
            events,
        }
    }

    /// Cookie jar holding the access token; hand it to `GraphQlClient::with_cookie_jar`.
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn is_logged_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Persist a fresh session and announce it.
    pub async fn login(&self, payload: AuthPayload) -> Result<Session> {
        let session = Session::from(payload);

        let stored = StoredSession {
            access_token: session.access_token.expose_secret().to_string(),
            refresh_token: session
                .refresh_token
                .as_ref()
                .map(|t| t.expose_secret().to_string()),
            user: Some(session.user.clone()),
        };
        if let Some(parent) = self.storage_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.storage_path, serde_json::to_vec_pretty(&stored)?).await?;

        self.jar.add_cookie_str(
            &format!(
                "{ACCESS_TOKEN_COOKIE}={}; Path=/; SameSite=Lax",
                session.access_token.expose_secret()
            ),
            &self.cookie_url,
        );

        *self.current.write().await = Some(session.clone());
        info!("Signed in as {}", session.user.full_name);
        // No subscribers is fine.
        let _ = self.events.send(AuthEvent::LoggedIn(session.user.clone()));

        Ok(session)
    }

    /// Drop both copies and announce the logout.
    pub async fn logout(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.storage_path).await {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        self.jar.add_cookie_str(
            &format!("{ACCESS_TOKEN_COOKIE}=; Path=/; Max-Age=0"),
            &self.cookie_url,
        );

        *self.current.write().await = None;
        info!("Signed out");
        let _ = self.events.send(AuthEvent::LoggedOut);
        Ok(())
    }

    /// Restore from local storage, falling back to the cookie. The cookie
    /// alone carries no user; callers refresh it with the `me` query.
    pub async fn restore(&self) -> Option<Session> {
        let from_file = match tokio::fs::read(&self.storage_path).await {
            Ok(bytes) => match serde_json::from_slice::<StoredSession>(&bytes) {
                Ok(stored) => Some(stored),
                Err(err) => {
                    warn!("Ignoring unreadable session file: {}", err);
                    None
                }
            },
            Err(_) => None,
        };

        let stored = from_file.or_else(|| {
            self.cookie_token().map(|access_token| StoredSession {
                access_token,
                refresh_token: None,
                user: None,
            })
        })?;

        let Some(user) = stored.user else {
            debug!("Found a token without a user; session needs a `me` refresh");
            return None;
        };

        let session = Session {
            access_token: SecretString::from(stored.access_token),
            refresh_token: stored.refresh_token.map(SecretString::from),
            user,
        };
        *self.current.write().await = Some(session.clone());
        Some(session)
    }

    /// Access token as held by the cookie jar.
    pub fn cookie_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.cookie_url)?;
        let header = header.to_str().ok()?;
        header.split(';').find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == ACCESS_TOKEN_COOKIE && !value.is_empty()).then(|| value.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn payload() -> AuthPayload {
        AuthPayload {
            access_token: "tok-123".into(),
            refresh_token: Some("ref-456".into()),
            user: User {
                id: "u1".into(),
                full_name: "Sita Sharma".into(),
                phone: Some("9812345678".into()),
                email: None,
                role: Role::Agent,
            },
        }
    }

    fn store(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(
            dir.path().join("session.json"),
            Arc::new(Jar::default()),
            Url::parse("http://localhost:8080/").unwrap(),
        )
    }

    #[tokio::test]
    async fn login_persists_to_both_stores_and_notifies() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let mut events = store.subscribe();

        store.login(payload()).await.unwrap();

        assert!(dir.path().join("session.json").exists());
        assert_eq!(store.cookie_token().as_deref(), Some("tok-123"));
        assert!(matches!(events.recv().await.unwrap(), AuthEvent::LoggedIn(user) if user.id == "u1"));
    }

    #[tokio::test]
    async fn logout_clears_everything() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        store.login(payload()).await.unwrap();
        let mut events = store.subscribe();

        store.logout().await.unwrap();

        assert!(!dir.path().join("session.json").exists());
        assert_eq!(store.cookie_token(), None);
        assert!(!store.is_logged_in().await);
        assert_eq!(events.recv().await.unwrap(), AuthEvent::LoggedOut);
        // A second logout is harmless.
        store.logout().await.unwrap();
    }

    #[tokio::test]
    async fn restore_reads_local_storage() {
        let dir = tempfile::tempdir().unwrap();
        store(&dir).login(payload()).await.unwrap();

        let fresh = store(&dir);
        let session = fresh.restore().await.unwrap();
        assert_eq!(session.user.full_name, "Sita Sharma");
        assert_eq!(session.access_token.expose_secret(), "tok-123");
        assert!(fresh.is_logged_in().await);
    }
}
