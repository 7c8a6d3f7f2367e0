//! The single choke point for outbound HTTP.
//!
//! Every network call in the crate goes through a [`Transport`]. The
//! production implementation attaches the current session token and
//! cache-busting headers so repeated identical requests are never served
//! from a transport-level cache. Exactly one attempt per call; retry policy
//! belongs to whoever initiated the user action.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issues one request against the remote service. Failures come back as
    /// tagged [`ApiError`] values, never as panics.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    sessions: Arc<SessionStore>,
}

impl HttpTransport {
    pub fn new(
        config: &ApiConfig,
        client: reqwest::Client,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sessions,
        }
    }

    /// Pulls a human-readable message out of an error body. The remote wraps
    /// failures as `{"message": "..."}`; anything else is passed through raw.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
            .unwrap_or_else(|| body.trim().to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Executing request");

        let mut request = self
            .client
            .request(method, &url)
            .header(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(header::PRAGMA, "no-cache")
            .header(header::EXPIRES, "0");

        let token = self.sessions.token().await;
        let token_attached = token.is_some();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|e| ApiError::Decode(e.to_string()));
        }

        let text = response.text().await.unwrap_or_default();
        let message = Self::error_message(&text);

        // A 401-class response on an authenticated call means the token is no
        // longer good: transition to logged-out before surfacing the error.
        if status == StatusCode::UNAUTHORIZED && token_attached {
            warn!("Session rejected by server, clearing stored session");
            self.sessions.clear().await;
            return Err(ApiError::SessionExpired);
        }

        Err(ApiError::Http {
            status: status.as_u16(),
            message,
        })
    }
}
