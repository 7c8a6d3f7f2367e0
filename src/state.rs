use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::cache::EntityCache;
use crate::config::Config;
use crate::events::AppEvent;
use crate::services::{CachedRecipeService, RecipeService};
use crate::session::{SessionManager, SessionStore};
use crate::transport::{HttpTransport, Transport};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// One client for the whole process enables connection pooling.
fn build_shared_http_client(config: &Config) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.api.request_timeout_seconds))
        .user_agent(config.api.user_agent.clone())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// The one owning context per running client: every component is wired here
/// and shared by `Arc`, with no process-wide globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    pub sessions: Arc<SessionStore>,

    pub auth: Arc<SessionManager>,

    pub cache: Arc<EntityCache>,

    pub recipes: Arc<dyn RecipeService>,

    pub event_bus: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        let sessions = SessionStore::open(config.session.resolved_path(), event_bus.clone());

        let client = build_shared_http_client(&config)?;
        let transport: Arc<dyn Transport> =
            Arc::new(HttpTransport::new(&config.api, client, sessions.clone()));

        Ok(Self::wire(config, event_bus, sessions, transport))
    }

    /// Same wiring with a caller-supplied transport; the seam tests use to
    /// script the remote.
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let (event_bus, _) = broadcast::channel(config.general.event_bus_buffer_size);
        let sessions = SessionStore::open(config.session.resolved_path(), event_bus.clone());
        Self::wire(config, event_bus, sessions, transport)
    }

    fn wire(
        config: Config,
        event_bus: broadcast::Sender<AppEvent>,
        sessions: Arc<SessionStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let cache = EntityCache::new(
            transport.clone(),
            event_bus.clone(),
            Duration::from_secs(config.cache.freshness_seconds),
        );

        let auth = Arc::new(SessionManager::new(transport.clone(), sessions.clone()));
        let recipes: Arc<dyn RecipeService> =
            Arc::new(CachedRecipeService::new(cache.clone(), transport));

        Self {
            config: Arc::new(config),
            sessions,
            auth,
            cache,
            recipes,
            event_bus,
        }
    }

    /// New receiver on the shared event bus. Dropping it never affects
    /// other subscribers.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_bus.subscribe()
    }
}
