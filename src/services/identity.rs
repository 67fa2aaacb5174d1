/// Identity service provider
///
/// Authentication is an external collaborator; the core only consumes the
/// current user as present or absent. [`FirebaseIdentity`] implements the
/// trait over the Firebase identity REST endpoints, keeping the session in
/// a watch channel so consumers can subscribe to "current user changed"
/// notifications.
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::User,
};

/// Trait for identity providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Identity: Send + Sync {
    /// Creates an account and signs the new user in
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<User>;

    /// Signs an existing user in
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<User>;

    /// Clears the current session
    async fn sign_out(&self) -> AppResult<()>;

    /// The signed-in user, if any
    fn current_user(&self) -> Option<User>;

    /// Subscribes to current-user-changed notifications
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
}

pub struct FirebaseIdentity {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    session: watch::Sender<Option<User>>,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "localId")]
    local_id: String,
    email: String,
}

#[derive(Deserialize)]
struct AuthErrorBody {
    error: AuthErrorDetail,
}

#[derive(Deserialize)]
struct AuthErrorDetail {
    message: String,
}

impl FirebaseIdentity {
    pub fn new(api_key: String, api_url: String) -> Self {
        let (session, _) = watch::channel(None);
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            session,
        }
    }

    /// Calls one of the identity endpoints with an email/password payload
    /// and installs the resulting user as the current session.
    async fn authenticate(&self, endpoint: &str, email: &str, password: &str) -> AppResult<User> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput(
                "Email and password are required".to_string(),
            ));
        }

        let url = format!("{}/accounts:{}", self.api_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AuthErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "Authentication failed".to_string());
            return Err(AppError::Unauthenticated(message));
        }

        let auth: AuthResponse = response.json().await?;
        let user = User {
            uid: auth.local_id,
            email: auth.email,
        };

        self.session.send_replace(Some(user.clone()));
        tracing::info!(uid = %user.uid, "User signed in");

        Ok(user)
    }
}

#[async_trait::async_trait]
impl Identity for FirebaseIdentity {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<User> {
        self.authenticate("signUp", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<User> {
        self.authenticate("signInWithPassword", email, password).await
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.session.send_replace(None);
        tracing::info!("User signed out");
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.session.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.session.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sign_out_clears_session_and_notifies() {
        let identity = FirebaseIdentity::new("key".to_string(), "http://unused".to_string());
        let mut changes = identity.subscribe();

        identity.session.send_replace(Some(User {
            uid: "u1".to_string(),
            email: "a@b.c".to_string(),
        }));
        assert!(identity.current_user().is_some());
        assert!(changes.has_changed().unwrap());
        changes.mark_unchanged();

        identity.sign_out().await.unwrap();
        assert!(identity.current_user().is_none());
        assert!(changes.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_without_network_call() {
        let identity = FirebaseIdentity::new("key".to_string(), "http://unused".to_string());
        let err = identity.sign_in("", "pw").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
