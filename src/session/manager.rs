//! Login/logout lifecycle over the session store.
//!
//! Two states, derived from the store snapshot: `Anonymous` and
//! `Authenticated`. The initial state on process start is whatever the
//! persisted session says. Gating a protected view is a synchronous check
//! against the snapshot; no network round-trip.

use std::sync::Arc;

use reqwest::Method;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::models::{Session, User};
use crate::session::SessionStore;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

pub struct SessionManager {
    transport: Arc<dyn Transport>,
    store: Arc<SessionStore>,
}

impl SessionManager {
    pub fn new(transport: Arc<dyn Transport>, store: Arc<SessionStore>) -> Self {
        Self { transport, store }
    }

    pub async fn state(&self) -> AuthState {
        if self.store.is_authenticated().await {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Sends credentials to the login endpoint and, on success, writes the
    /// returned session into the store. Invalid credentials surface the
    /// server's error unchanged and leave the state anonymous.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ApiError::Validation(
                "Username and password are required".to_string(),
            ));
        }

        let body = json!({ "username": username, "password": password });
        let value = self
            .transport
            .execute(Method::POST, "/auth/login", Some(body))
            .await?;

        let session: Session =
            serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))?;

        info!(user = %session.user.username, "Logged in");
        self.store.set(session.clone()).await;
        Ok(session)
    }

    pub async fn logout(&self) {
        info!("Logging out");
        self.store.clear().await;
    }

    /// Fetches the profile of the signed-in user from the remote.
    pub async fn me(&self) -> Result<User, ApiError> {
        self.require_session().await?;
        let value = self.transport.execute(Method::GET, "/auth/me", None).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// The view gate: returns the current session or an error that routes
    /// the caller to the login entry point.
    pub async fn require_session(&self) -> Result<Session, ApiError> {
        self.store.current().await.ok_or(ApiError::SessionExpired)
    }
}
