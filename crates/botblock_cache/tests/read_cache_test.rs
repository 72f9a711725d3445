//! Tests for the single-flight read cache.

use botblock_cache::{CACHE_TTL, CacheNamespace, CachedValue, ReadCache};
use botblock_error::{BotBlockResult, TransportError, TransportErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Fetch function that counts invocations and returns `value`.
async fn counted(calls: Arc<AtomicUsize>, value: &str) -> BotBlockResult<String> {
    calls.fetch_add(1, Ordering::SeqCst);
    Ok(value.to_string())
}

async fn failing(calls: Arc<AtomicUsize>) -> BotBlockResult<String> {
    calls.fetch_add(1, Ordering::SeqCst);
    Err(TransportError::new(TransportErrorKind::Network("connection refused".into())).into())
}

#[tokio::test(start_paused = true)]
async fn test_hit_within_ttl_makes_no_call() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let first = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "a"))
        .await;
    tokio::time::advance(CACHE_TTL - Duration::from_secs(1)).await;
    let second = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "b"))
        .await;

    assert_eq!(first.value().map(String::as_str), Some("a"));
    assert_eq!(second.value().map(String::as_str), Some("a"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_read_after_ttl_fetches_once_more() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "a"))
        .await;
    tokio::time::advance(CACHE_TTL + Duration::from_secs(1)).await;

    let refreshed = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "b"))
        .await;
    assert_eq!(refreshed.value().map(String::as_str), Some("b"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The refreshed entry is itself cached
    cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "c"))
        .await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_ttl_is_not_extended_by_reads() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    cache
        .get_or_fetch(CacheNamespace::List, "1", false, || counted(calls.clone(), "a"))
        .await;
    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(50)).await;
        cache
            .get_or_fetch(CacheNamespace::List, "1", false, || counted(calls.clone(), "b"))
            .await;
    }

    // 150s after the write: the third read had to refetch
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_misses_share_one_fetch() {
    let cache: ReadCache<String> = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let lookups = (0..16).map(|_| {
        let cache = cache.clone();
        let calls = calls.clone();
        async move {
            cache
                .get_or_fetch(CacheNamespace::Bot, "42", false, || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    BotBlockResult::Ok("shared".to_string())
                })
                .await
        }
    });
    let results = futures::future::join_all(lookups).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(results.len(), 16);
    for result in results {
        assert_eq!(result.value().map(String::as_str), Some("shared"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_misses_share_one_failure() {
    let cache: ReadCache<String> = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let lookups = (0..8).map(|_| {
        let cache = cache.clone();
        let calls = calls.clone();
        async move {
            cache
                .get_or_fetch(CacheNamespace::Bot, "42", false, || async move {
                    tokio::time::sleep(Duration::from_millis(100)).await;
                    failing(calls).await
                })
                .await
        }
    });
    let results = futures::future::join_all(lookups).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let errors: Vec<_> = results
        .into_iter()
        .map(|r| r.into_result().unwrap_err())
        .collect();
    for err in &errors[1..] {
        assert!(Arc::ptr_eq(&errors[0], err));
    }
}

#[tokio::test(start_paused = true)]
async fn test_failure_is_cached_as_unavailable() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let first = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || failing(calls.clone()))
        .await;
    assert!(!first.is_available());
    assert!(first.error().is_some());

    let second = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "a"))
        .await;
    assert!(matches!(second, CachedValue::Unavailable(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Unavailable means "no data now": it expires like any entry
    tokio::time::advance(CACHE_TTL).await;
    let third = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "a"))
        .await;
    assert_eq!(third.value().map(String::as_str), Some("a"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_namespaces_do_not_collide() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    let bot = cache
        .get_or_fetch(CacheNamespace::Bot, "1", false, || counted(calls.clone(), "bot"))
        .await;
    let list = cache
        .get_or_fetch(CacheNamespace::List, "1", false, || counted(calls.clone(), "list"))
        .await;

    assert_eq!(bot.value().map(String::as_str), Some("bot"));
    assert_eq!(list.value().map(String::as_str), Some("list"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(cache.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_bypass_always_fetches_and_stores_nothing() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let value = cache
            .get_or_fetch(CacheNamespace::Bot, "1", true, || counted(calls.clone(), "a"))
            .await;
        assert!(value.is_available());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(cache.is_empty());

    let failed = cache
        .get_or_fetch(CacheNamespace::Bot, "1", true, || failing(calls.clone()))
        .await;
    assert!(failed.error().is_some());
    assert!(cache.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_purge_expired() {
    let cache = ReadCache::new();
    let calls = Arc::new(AtomicUsize::new(0));

    cache
        .get_or_fetch(CacheNamespace::Bot, "old", false, || counted(calls.clone(), "a"))
        .await;
    tokio::time::advance(Duration::from_secs(90)).await;
    cache
        .get_or_fetch(CacheNamespace::Bot, "new", false, || counted(calls.clone(), "b"))
        .await;
    tokio::time::advance(Duration::from_secs(60)).await;

    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_namespace_display() {
    assert_eq!(CacheNamespace::Bot.to_string(), "bot");
    assert_eq!(CacheNamespace::List.to_string(), "list");
}
