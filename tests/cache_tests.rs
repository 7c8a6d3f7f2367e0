//! Entity cache behavior: single-flight reads, tag invalidation scope,
//! stale-while-refetch, last-request-wins ordering.

mod common;

use std::time::Duration;

use tokio::sync::broadcast;

use common::{ScriptedTransport, page_json, recipe_json};
use forkful::cache::{CachedPayload, EntityCache, ListParams, QueryKey, QueryStatus, Tag};
use forkful::events::AppEvent;

fn new_cache(
    transport: std::sync::Arc<ScriptedTransport>,
) -> (
    std::sync::Arc<EntityCache>,
    broadcast::Receiver<AppEvent>,
) {
    let (bus, rx) = broadcast::channel(64);
    let cache = EntityCache::new(transport, bus, Duration::from_secs(60));
    (cache, rx)
}

fn list_key() -> QueryKey {
    QueryKey::RecipeList(ListParams::default())
}

#[tokio::test]
async fn concurrent_fetches_share_one_network_call() {
    let transport = ScriptedTransport::new();
    let gate = transport.push_gate();
    let (cache, _rx) = new_cache(transport.clone());
    let key = list_key();

    gate.send(Ok(page_json(&[recipe_json(1, "Pho")], 1)))
        .unwrap();

    let (a, b) = tokio::join!(cache.fetch(&key), cache.fetch(&key));

    assert_eq!(transport.calls(), 1);
    let page_a = a.unwrap().into_page().unwrap();
    let page_b = b.unwrap().into_page().unwrap();
    assert_eq!(page_a, page_b);
    assert_eq!(page_a.recipes[0].name, "Pho");
}

#[tokio::test]
async fn invalidation_hits_exactly_the_tagged_entries() {
    let transport = ScriptedTransport::new();
    transport.push_ok(page_json(&[recipe_json(1, "Pho"), recipe_json(2, "Ragu")], 2));
    transport.push_ok(recipe_json(5, "Tagine"));
    let (cache, _rx) = new_cache(transport.clone());

    let list = list_key();
    let single = QueryKey::Recipe(5);
    cache.fetch(&list).await.unwrap();
    cache.fetch(&single).await.unwrap();

    // Recipe 1 is on the list page but is not recipe 5.
    cache.invalidate(Tag::Recipe(1)).await;

    assert!(cache.peek(&list).await.unwrap().stale);
    assert!(!cache.peek(&single).await.unwrap().stale);

    cache.invalidate(Tag::Recipe(5)).await;
    assert!(cache.peek(&single).await.unwrap().stale);
}

#[tokio::test]
async fn stale_entry_serves_old_payload_while_refetching() {
    let transport = ScriptedTransport::new();
    transport.push_ok(page_json(&[recipe_json(1, "Pho")], 1));
    let (cache, _rx) = new_cache(transport.clone());
    let key = list_key();

    cache.fetch(&key).await.unwrap();
    cache.invalidate(Tag::RecipeList).await;

    // The refetch this read schedules stays parked behind the gate while we
    // look at the snapshot.
    let _gate = transport.push_gate();
    let snapshot = cache.read(&key).await;

    assert_eq!(snapshot.status, QueryStatus::Loading);
    assert!(snapshot.stale);
    match snapshot.payload {
        Some(CachedPayload::Page(page)) => assert_eq!(page.recipes[0].name, "Pho"),
        other => panic!("expected the old page to still be served, got {other:?}"),
    }

    // Give the spawned fetch task a chance to reach the transport.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn reads_of_a_loading_entry_do_not_issue_a_second_call() {
    let transport = ScriptedTransport::new();
    let _gate = transport.push_gate();
    let (cache, _rx) = new_cache(transport.clone());
    let key = list_key();

    let first = cache.read(&key).await;
    assert_eq!(first.status, QueryStatus::Loading);

    for _ in 0..5 {
        cache.read(&key).await;
    }

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn late_response_from_superseded_request_is_discarded() {
    let transport = ScriptedTransport::new();
    let gate_a = transport.push_gate();
    let gate_b = transport.push_gate();
    let (cache, mut rx) = new_cache(transport.clone());
    let key = list_key();

    // Request A through a plain read, then request B force-issued on top.
    cache.read(&key).await;
    cache.refresh(&key).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.calls(), 2);

    // B's response lands first and is applied.
    gate_b
        .send(Ok(page_json(&[recipe_json(2, "From B")], 1)))
        .unwrap();
    loop {
        if let AppEvent::QueryUpdated(updated) = rx.recv().await.unwrap() {
            assert_eq!(updated, key);
            break;
        }
    }

    // A's response arrives afterwards and must be thrown away.
    gate_a
        .send(Ok(page_json(&[recipe_json(1, "From A")], 1)))
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let snapshot = cache.peek(&key).await.unwrap();
    match snapshot.payload {
        Some(CachedPayload::Page(page)) => assert_eq!(page.recipes[0].name, "From B"),
        other => panic!("expected B's page, got {other:?}"),
    }
}

#[tokio::test]
async fn invalidation_during_flight_applies_result_then_restales() {
    let transport = ScriptedTransport::new();
    transport.push_ok(page_json(&[recipe_json(1, "Pho")], 1));
    let (cache, mut rx) = new_cache(transport.clone());
    let key = list_key();

    cache.fetch(&key).await.unwrap();

    let gate = transport.push_gate();
    cache.refresh(&key).await;

    // Invalidated while the refetch is in flight.
    cache.invalidate(Tag::RecipeList).await;

    gate.send(Ok(page_json(&[recipe_json(1, "Pho v2")], 1)))
        .unwrap();
    // Two QueryUpdated events total: the initial load and the gated refetch.
    let mut updates = 0;
    while updates < 2 {
        if let AppEvent::QueryUpdated(_) = rx.recv().await.unwrap() {
            updates += 1;
        }
    }

    // The in-flight result was not wasted, but the entry is stale again so
    // the next read refetches.
    let snapshot = cache.peek(&key).await.unwrap();
    assert_eq!(snapshot.status, QueryStatus::Loaded);
    assert!(snapshot.stale);
    match snapshot.payload {
        Some(CachedPayload::Page(page)) => assert_eq!(page.recipes[0].name, "Pho v2"),
        other => panic!("expected the refetched page, got {other:?}"),
    }

    let _gate = transport.push_gate();
    cache.read(&key).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(transport.calls(), 3);
}

#[tokio::test]
async fn invalidation_during_the_first_fetch_still_stales_the_entry() {
    let transport = ScriptedTransport::new();
    let gate = transport.push_gate();
    let (cache, mut rx) = new_cache(transport.clone());
    let key = list_key();

    // The very first fetch for this key is parked behind the gate; the entry
    // has never held a payload.
    cache.read(&key).await;

    // A mutation invalidates the collection while that fetch is in flight.
    cache.invalidate(Tag::RecipeList).await;

    gate.send(Ok(page_json(&[recipe_json(1, "Pho")], 1)))
        .unwrap();
    loop {
        if let AppEvent::QueryUpdated(_) = rx.recv().await.unwrap() {
            break;
        }
    }

    // The result is applied, not wasted, but the entry must come out stale.
    let snapshot = cache.peek(&key).await.unwrap();
    assert_eq!(snapshot.status, QueryStatus::Loaded);
    assert!(snapshot.stale);
    match snapshot.payload {
        Some(CachedPayload::Page(page)) => assert_eq!(page.recipes[0].name, "Pho"),
        other => panic!("expected the in-flight page to be applied, got {other:?}"),
    }
}

#[tokio::test]
async fn fetch_error_is_reported_and_next_read_retries() {
    let transport = ScriptedTransport::new();
    transport.push_err(forkful::error::ApiError::Network("unreachable".to_string()));
    transport.push_ok(page_json(&[recipe_json(1, "Pho")], 1));
    let (cache, _rx) = new_cache(transport.clone());
    let key = list_key();

    let err = cache.fetch(&key).await.unwrap_err();
    assert!(matches!(err, forkful::error::ApiError::Network(_)));
    assert_eq!(cache.peek(&key).await.unwrap().status, QueryStatus::Error);

    // The caller retried the action; the errored entry refetches.
    let page = cache.fetch(&key).await.unwrap().into_page().unwrap();
    assert_eq!(page.recipes[0].name, "Pho");
    assert_eq!(transport.calls(), 2);
}
