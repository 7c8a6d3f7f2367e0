//! Durable holder of the one active session.
//!
//! The in-memory copy and the file on disk are updated under a single write
//! lock, so a read immediately after `set` or `clear` observes the new
//! value. Storage failures degrade to logged-out rather than erroring: a
//! session that cannot be read back is no session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

use crate::events::AppEvent;
use crate::models::Session;

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    saved_at: String,
    session: Session,
}

pub struct SessionStore {
    current: RwLock<Option<Session>>,
    path: PathBuf,
    events: broadcast::Sender<AppEvent>,
}

impl SessionStore {
    /// Opens the store, reading any persisted session from `path`.
    #[must_use]
    pub fn open(path: PathBuf, events: broadcast::Sender<AppEvent>) -> Arc<Self> {
        let session = Self::read_record(&path);
        Arc::new(Self {
            current: RwLock::new(session),
            path,
            events,
        })
    }

    fn read_record(path: &Path) -> Option<Session> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "No persisted session");
                return None;
            }
        };

        match serde_json::from_str::<SessionRecord>(&content) {
            Ok(record) => {
                debug!(user = %record.session.user.username, "Restored persisted session");
                Some(record.session)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                None
            }
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Replaces the held session and persists it before the lock is released.
    pub async fn set(&self, session: Session) {
        {
            let mut guard = self.current.write().await;
            self.persist(&session);
            *guard = Some(session);
        }
        let _ = self
            .events
            .send(AppEvent::SessionChanged { authenticated: true });
    }

    /// Drops the held session and its durable copy.
    pub async fn clear(&self) {
        {
            let mut guard = self.current.write().await;
            if let Err(e) = std::fs::remove_file(&self.path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!(path = %self.path.display(), error = %e, "Failed to remove session file");
            }
            *guard = None;
        }
        let _ = self
            .events
            .send(AppEvent::SessionChanged {
                authenticated: false,
            });
    }

    fn persist(&self, session: &Session) {
        let record = SessionRecord {
            saved_at: chrono::Utc::now().to_rfc3339(),
            session: session.clone(),
        };

        let result = (|| -> std::io::Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(&record)?;
            std::fs::write(&self.path, content)
        })();

        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "Failed to persist session");
        }
    }
}
