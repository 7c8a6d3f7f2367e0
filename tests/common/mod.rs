//! Shared helpers for the integration tests: a scripted transport standing
//! in for the remote service, plus JSON fixtures.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use forkful::config::Config;
use forkful::error::ApiError;
use forkful::state::AppState;
use forkful::transport::Transport;

enum Step {
    Reply(Result<Value, ApiError>),
    Gated(oneshot::Receiver<Result<Value, ApiError>>),
}

/// Transport double that replays a script. Each `execute` call consumes the
/// next step; a gated step suspends until the test releases it, which is how
/// the tests control response ordering.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(Method, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push_ok(&self, value: Value) {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Reply(Ok(value)));
    }

    pub fn push_err(&self, err: ApiError) {
        self.steps
            .lock()
            .unwrap()
            .push_back(Step::Reply(Err(err)));
    }

    /// Queues a step that blocks until the returned sender fires.
    pub fn push_gate(&self) -> oneshot::Sender<Result<Value, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.steps.lock().unwrap().push_back(Step::Gated(rx));
        tx
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(Method, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(
        &self,
        method: Method,
        path: &str,
        _body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((method, path.to_string()));

        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Reply(result)) => result,
            Some(Step::Gated(rx)) => rx
                .await
                .map_err(|_| ApiError::Network("gate dropped".to_string()))?,
            None => Err(ApiError::Network("transport script exhausted".to_string())),
        }
    }
}

/// App state wired to the scripted transport, with the session file kept in
/// the given temp dir so tests never touch the real config location.
pub fn test_state(transport: Arc<ScriptedTransport>, session_dir: &tempfile::TempDir) -> AppState {
    let mut config = Config::default();
    config.session.path = session_dir
        .path()
        .join("session.json")
        .to_string_lossy()
        .into_owned();
    AppState::with_transport(config, transport)
}

pub fn recipe_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "ingredients": ["salt"],
        "instructions": ["cook"],
        "prepTimeMinutes": 5,
        "cookTimeMinutes": 10,
        "servings": 2,
        "difficulty": "Easy",
        "cuisine": "Test",
        "caloriesPerServing": 100,
        "tags": [],
        "image": "",
        "rating": 4.0,
        "reviewCount": 3
    })
}

pub fn page_json(recipes: &[Value], total: u32) -> Value {
    json!({
        "recipes": recipes,
        "total": total,
        "skip": 0,
        "limit": 10
    })
}

pub fn session_json(username: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "email": format!("{username}@example.com"),
        "firstName": "Test",
        "lastName": "User",
        "image": "https://example.com/avatar.png",
        "accessToken": format!("token-for-{username}"),
        "refreshToken": "refresh"
    })
}
