use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::User;

use super::ApiClient;

const LOGIN_PATH: &str = "users/auth/login/";
const REFRESH_PATH: &str = "users/auth/token/refresh/";
const ME_PATH: &str = "users/users/me/";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tokens {
    access: String,
    refresh: String,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    refresh: Option<String>,
}

/// The logged-in identity, persisted between runs as a token file.
pub struct Session {
    path: PathBuf,
    tokens: Option<Tokens>,
    user: Option<User>,
}

impl Session {
    pub fn anonymous(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            tokens: None,
            user: None,
        }
    }

    /// Restore stored tokens and validate them against the server.
    ///
    /// An expired access token is refreshed once. If the tokens are rejected
    /// outright the stored file is removed and the session stays anonymous.
    pub async fn init(path: impl Into<PathBuf>, api: &ApiClient) -> Result<Self> {
        let mut session = Self::anonymous(path);
        let Some(mut tokens) = load_tokens(&session.path)? else {
            return Ok(session);
        };

        let user = match fetch_me(api, &tokens.access).await {
            Ok(user) => Some(user),
            Err(AppError::Unauthorized) => match refresh(api, &tokens.refresh).await {
                Ok(refreshed) => {
                    tokens.access = refreshed.access;
                    if let Some(rotated) = refreshed.refresh {
                        tokens.refresh = rotated;
                    }
                    match fetch_me(api, &tokens.access).await {
                        Ok(user) => {
                            store_tokens(&session.path, &tokens)?;
                            Some(user)
                        }
                        Err(AppError::Unauthorized) | Err(AppError::Validation(_)) => None,
                        Err(e) => return Err(e),
                    }
                }
                Err(AppError::Unauthorized) | Err(AppError::Validation(_)) => None,
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        };

        match user {
            Some(user) => {
                tracing::debug!(email = %user.email, "Restored session");
                session.tokens = Some(tokens);
                session.user = Some(user);
            }
            None => {
                tracing::warn!("Stored session was rejected, logging out");
                session.teardown()?;
            }
        }

        Ok(session)
    }

    pub async fn login(&mut self, api: &ApiClient, email: &str, password: &str) -> Result<&User> {
        let tokens: Tokens = api
            .post_json(LOGIN_PATH, &LoginRequest { email, password })
            .await?;
        let user = fetch_me(api, &tokens.access).await?;
        store_tokens(&self.path, &tokens)?;
        tracing::info!(email = %user.email, role = user.role.label(), "Logged in");

        self.tokens = Some(tokens);
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    /// Forget the identity and delete the stored tokens.
    pub fn teardown(&mut self) -> Result<()> {
        self.tokens = None;
        self.user = None;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.tokens.as_ref().map(|t| t.access.as_str())
    }
}

async fn fetch_me(api: &ApiClient, access: &str) -> Result<User> {
    api.with_token(access).get_json(ME_PATH).await
}

async fn refresh(api: &ApiClient, refresh: &str) -> Result<RefreshResponse> {
    api.post_json(REFRESH_PATH, &RefreshRequest { refresh }).await
}

fn load_tokens(path: &Path) -> Result<Option<Tokens>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str(&content) {
        Ok(tokens) => Ok(Some(tokens)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn store_tokens(path: &Path, tokens: &Tokens) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(tokens)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::services::test_server::{serve, Request};

    fn tokens() -> Tokens {
        Tokens {
            access: "a".to_string(),
            refresh: "r".to_string(),
        }
    }

    #[test]
    fn tokens_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        assert_eq!(load_tokens(&path).unwrap(), None);

        store_tokens(&path, &tokens()).unwrap();
        assert_eq!(load_tokens(&path).unwrap(), Some(tokens()));
    }

    #[test]
    fn corrupt_file_is_treated_as_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_tokens(&path).unwrap(), None);
    }

    #[test]
    fn teardown_removes_file_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        store_tokens(&path, &tokens()).unwrap();

        let mut session = Session::anonymous(&path);
        session.tokens = Some(tokens());
        session.teardown().unwrap();

        assert!(!path.exists());
        assert!(session.access_token().is_none());
        assert!(session.user().is_none());
        // Second teardown is harmless.
        session.teardown().unwrap();
    }

    #[tokio::test]
    async fn init_without_stored_tokens_is_anonymous() {
        let dir = tempfile::tempdir().unwrap();
        let api = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(100)).unwrap();
        let session = Session::init(dir.path().join("session.json"), &api).await.unwrap();
        assert!(session.user().is_none());
    }

    const ME: &str = r#"{"id": 4, "email": "dana@example.com", "first_name": "Dana", "role": "manager"}"#;

    async fn api_for(handler: impl Fn(&Request) -> (u16, String) + Send + Sync + 'static) -> ApiClient {
        let base = serve(handler).await;
        ApiClient::new(&base, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn expired_access_token_is_refreshed_once() {
        let api = api_for(|req| match req.path.as_str() {
            "/api/users/users/me/" if req.bearer() == Some("fresh") => (200, ME.to_string()),
            "/api/users/users/me/" => (401, r#"{"detail": "Token is expired"}"#.to_string()),
            "/api/users/auth/token/refresh/" if req.body.contains(r#""refresh":"r""#) => {
                (200, r#"{"access": "fresh"}"#.to_string())
            }
            _ => (404, "{}".to_string()),
        })
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        store_tokens(&path, &tokens()).unwrap();

        let session = Session::init(&path, &api).await.unwrap();

        assert_eq!(session.user().map(|u| u.email.as_str()), Some("dana@example.com"));
        assert_eq!(session.access_token(), Some("fresh"));
        let stored = load_tokens(&path).unwrap().unwrap();
        assert_eq!(stored.access, "fresh");
        assert_eq!(stored.refresh, "r");
    }

    #[tokio::test]
    async fn rejected_refresh_logs_out() {
        let api = api_for(|req| match req.path.as_str() {
            "/api/users/users/me/" => (401, "{}".to_string()),
            _ => (401, r#"{"detail": "Token is invalid or expired"}"#.to_string()),
        })
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        store_tokens(&path, &tokens()).unwrap();

        let session = Session::init(&path, &api).await.unwrap();

        assert!(session.user().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn refreshed_token_still_rejected_logs_out() {
        let api = api_for(|req| match req.path.as_str() {
            "/api/users/users/me/" => (401, "{}".to_string()),
            _ => (200, r#"{"access": "fresh"}"#.to_string()),
        })
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        store_tokens(&path, &tokens()).unwrap();

        let session = Session::init(&path, &api).await.unwrap();

        assert!(session.user().is_none());
        assert!(session.access_token().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn login_persists_tokens() {
        let api = api_for(|req| match (req.method.as_str(), req.path.as_str()) {
            ("POST", "/api/users/auth/login/") if req.body.contains("dana@example.com") => {
                (200, r#"{"access": "a", "refresh": "r"}"#.to_string())
            }
            ("GET", "/api/users/users/me/") if req.bearer() == Some("a") => (200, ME.to_string()),
            _ => (400, r#"{"non_field_errors": ["Invalid credentials"]}"#.to_string()),
        })
        .await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::anonymous(&path);
        let user = session.login(&api, "dana@example.com", "pw").await.unwrap();
        assert_eq!(user.role, crate::models::Role::Manager);
        assert_eq!(load_tokens(&path).unwrap(), Some(tokens_with("a", "r")));

        let mut other = Session::anonymous(dir.path().join("other.json"));
        let err = other.login(&api, "nobody@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(other.user().is_none());
    }

    fn tokens_with(access: &str, refresh: &str) -> Tokens {
        Tokens {
            access: access.to_string(),
            refresh: refresh.to_string(),
        }
    }
}
