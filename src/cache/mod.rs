//! Query cache over the remote recipe service.
//!
//! Stores the last-known server response per normalized query, serves it
//! while a refetch is in flight, and tracks the invalidation tags mutations
//! use to mark entries stale. Entries are owned exclusively by the cache;
//! callers only ever get snapshots.
//!
//! Concurrency rules:
//! - at most one in-flight fetch per query key for plain reads; concurrent
//!   callers attach to the same request,
//! - responses apply last-request-wins, keyed by a per-entry sequence
//!   number, so a late response from a superseded request is discarded,
//! - an invalidation that lands while a fetch is in flight does not discard
//!   the in-flight result; the result is applied and the entry is
//!   immediately re-marked stale so the next read refetches.

pub mod key;

pub use key::{ListParams, QueryKey, SortField, SortOrder, Tag};

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Method;
use tokio::sync::{Mutex, broadcast, oneshot};
use tracing::debug;

use crate::error::ApiError;
use crate::events::AppEvent;
use crate::models::{Recipe, RecipePage};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    #[default]
    Uninitialized,
    Loading,
    Loaded,
    Error,
}

/// Typed payload held by a cache entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    Page(RecipePage),
    Recipe(Recipe),
}

impl CachedPayload {
    /// Tags this payload provides: a listing carries the collection tag plus
    /// one specific tag per item on the page, a single item carries exactly
    /// its own tag.
    fn tags(&self) -> HashSet<Tag> {
        match self {
            Self::Page(page) => {
                let mut tags: HashSet<Tag> =
                    page.recipes.iter().map(|r| Tag::Recipe(r.id)).collect();
                tags.insert(Tag::RecipeList);
                tags
            }
            Self::Recipe(recipe) => HashSet::from([Tag::Recipe(recipe.id)]),
        }
    }

    pub fn into_page(self) -> Result<RecipePage, ApiError> {
        match self {
            Self::Page(page) => Ok(page),
            Self::Recipe(_) => Err(ApiError::Decode(
                "expected a listing payload".to_string(),
            )),
        }
    }

    pub fn into_recipe(self) -> Result<Recipe, ApiError> {
        match self {
            Self::Recipe(recipe) => Ok(recipe),
            Self::Page(_) => Err(ApiError::Decode(
                "expected a single-recipe payload".to_string(),
            )),
        }
    }
}

/// What a caller sees of an entry at one point in time.
#[derive(Debug, Clone)]
pub struct QuerySnapshot {
    pub status: QueryStatus,
    pub payload: Option<CachedPayload>,
    pub error: Option<ApiError>,
    pub stale: bool,
}

#[derive(Default)]
struct Entry {
    status: QueryStatus,
    payload: Option<CachedPayload>,
    error: Option<ApiError>,
    tags: HashSet<Tag>,
    stale: bool,
    fetched_at: Option<Instant>,
    /// Sequence number of the most recently issued request.
    issued_seq: u64,
    /// Sequence number of the most recently applied response.
    applied_seq: u64,
    /// Bumped on every invalidation; a fetch that was issued under an older
    /// generation leaves the entry stale when it lands.
    invalidation_gen: u64,
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Result<CachedPayload, ApiError>>>,
}

impl Entry {
    fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot {
            status: self.status,
            payload: self.payload.clone(),
            error: self.error.clone(),
            stale: self.stale,
        }
    }
}

pub struct EntityCache {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    transport: Arc<dyn Transport>,
    events: broadcast::Sender<AppEvent>,
    freshness: Duration,
}

impl EntityCache {
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        events: broadcast::Sender<AppEvent>,
        freshness: Duration,
    ) -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(HashMap::new()),
            transport,
            events,
            freshness,
        })
    }

    /// Returns the entry snapshot and, when the entry is uninitialized,
    /// errored, stale, or past the freshness window, schedules one background
    /// fetch. While a fetch is in flight no second one is issued.
    pub async fn read(self: &Arc<Self>, key: &QueryKey) -> QuerySnapshot {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key.clone()).or_default();
        if self.needs_fetch(entry) {
            self.issue_fetch(key, entry);
        }
        entry.snapshot()
    }

    /// Read-through variant that awaits the result. A fresh loaded entry is
    /// returned directly; otherwise the caller attaches to the in-flight
    /// request (issuing one if none exists) and receives its outcome.
    pub async fn fetch(self: &Arc<Self>, key: &QueryKey) -> Result<CachedPayload, ApiError> {
        let rx = {
            let mut entries = self.entries.lock().await;
            let entry = entries.entry(key.clone()).or_default();

            if entry.status == QueryStatus::Loaded
                && !entry.stale
                && self.is_fresh(entry)
                && let Some(payload) = entry.payload.clone()
            {
                return Ok(payload);
            }

            if !entry.in_flight {
                self.issue_fetch(key, entry);
            }
            let (tx, rx) = oneshot::channel();
            entry.waiters.push(tx);
            rx
        };

        rx.await
            .map_err(|_| ApiError::Network("fetch task dropped".to_string()))?
    }

    /// Force-issues a new fetch even if one is already in flight. The
    /// sequence numbers guarantee the newest request wins.
    pub async fn refresh(self: &Arc<Self>, key: &QueryKey) {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(key.clone()).or_default();
        self.issue_fetch(key, entry);
    }

    /// Marks stale every entry whose tag set contains `tag`, and only those.
    /// Stale entries keep serving their last payload until refetched.
    pub async fn invalidate(self: &Arc<Self>, tag: Tag) {
        let hit: Vec<QueryKey> = {
            let mut entries = self.entries.lock().await;
            entries
                .iter_mut()
                .filter(|(_, entry)| entry.tags.contains(&tag))
                .map(|(key, entry)| {
                    entry.stale = true;
                    entry.invalidation_gen += 1;
                    key.clone()
                })
                .collect()
        };

        for key in hit {
            debug!(%key, "Invalidated cache entry");
            let _ = self.events.send(AppEvent::QueryInvalidated(key));
        }
    }

    /// Entry snapshot without the refetch side effect of `read`.
    pub async fn peek(&self, key: &QueryKey) -> Option<QuerySnapshot> {
        self.entries.lock().await.get(key).map(Entry::snapshot)
    }

    fn is_fresh(&self, entry: &Entry) -> bool {
        entry
            .fetched_at
            .is_some_and(|at| at.elapsed() < self.freshness)
    }

    fn needs_fetch(&self, entry: &Entry) -> bool {
        if entry.in_flight {
            return false;
        }
        matches!(entry.status, QueryStatus::Uninitialized | QueryStatus::Error)
            || entry.stale
            || !self.is_fresh(entry)
    }

    /// Issues the fetch for `key`. Caller holds the entries lock; the
    /// network call itself runs on a spawned task.
    fn issue_fetch(self: &Arc<Self>, key: &QueryKey, entry: &mut Entry) {
        entry.issued_seq += 1;
        let seq = entry.issued_seq;
        let generation = entry.invalidation_gen;
        entry.status = QueryStatus::Loading;
        entry.in_flight = true;
        // Label the entry before any payload exists, so an invalidation that
        // lands during the first fetch still matches it.
        entry.tags.insert(key.tag());

        let cache = Arc::clone(self);
        let key = key.clone();
        debug!(%key, seq, "Issuing fetch");
        tokio::spawn(async move {
            let result = match cache
                .transport
                .execute(Method::GET, &key.request_path(), None)
                .await
            {
                Ok(value) => parse_payload(&key, value),
                Err(e) => Err(e),
            };
            cache.apply(key, seq, generation, result).await;
        });
    }

    async fn apply(
        self: &Arc<Self>,
        key: QueryKey,
        seq: u64,
        generation: u64,
        result: Result<CachedPayload, ApiError>,
    ) {
        {
            let mut entries = self.entries.lock().await;
            let Some(entry) = entries.get_mut(&key) else {
                return;
            };

            if seq == entry.issued_seq {
                entry.in_flight = false;
            }

            if seq <= entry.applied_seq {
                debug!(%key, seq, "Discarding superseded response");
                return;
            }
            entry.applied_seq = seq;

            match result {
                Ok(payload) => {
                    entry.status = QueryStatus::Loaded;
                    entry.tags = payload.tags();
                    entry.tags.insert(key.tag());
                    entry.payload = Some(payload.clone());
                    entry.error = None;
                    entry.fetched_at = Some(Instant::now());
                    // An invalidation that landed after this request was
                    // issued outranks its result: apply, then stay stale.
                    entry.stale = generation != entry.invalidation_gen;
                    for waiter in entry.waiters.drain(..) {
                        let _ = waiter.send(Ok(payload.clone()));
                    }
                }
                Err(err) => {
                    entry.status = QueryStatus::Error;
                    entry.error = Some(err.clone());
                    for waiter in entry.waiters.drain(..) {
                        let _ = waiter.send(Err(err.clone()));
                    }
                }
            }
        }

        let _ = self.events.send(AppEvent::QueryUpdated(key));
    }
}

fn parse_payload(key: &QueryKey, value: serde_json::Value) -> Result<CachedPayload, ApiError> {
    match key {
        QueryKey::RecipeList(_) => serde_json::from_value::<RecipePage>(value)
            .map(CachedPayload::Page)
            .map_err(|e| ApiError::Decode(e.to_string())),
        QueryKey::Recipe(_) => serde_json::from_value::<Recipe>(value)
            .map(CachedPayload::Recipe)
            .map_err(|e| ApiError::Decode(e.to_string())),
    }
}
