//! End-to-end tests for the cache layer over the in-memory store.
//!
//! These exercise the full path: registry construction, key encoding, TTL
//! policy, codecs and scan-based bulk invalidation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strata_cache::{
    Cache, CacheOptions, CacheRegistry, CacheSpec, CacheStore, JsonCodec, MemoryStore, RawCodec,
    REGISTRY_DEFAULT_TTL,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Order {
    a: u32,
    b: Vec<u32>,
}

fn sample_order() -> Order {
    Order { a: 1, b: vec![2, 3] }
}

fn raw_cache(store: &Arc<MemoryStore>) -> Cache<RawCodec> {
    Cache::new(
        Arc::clone(store) as Arc<dyn CacheStore>,
        "orders",
        "v1",
        CacheOptions::default(),
    )
}

fn json_cache(store: &Arc<MemoryStore>) -> Cache<JsonCodec<Order>> {
    Cache::new(
        Arc::clone(store) as Arc<dyn CacheStore>,
        "orders",
        "v1",
        CacheOptions::default(),
    )
}

#[tokio::test]
async fn test_raw_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    cache
        .set("order:42", None, &"v".to_string(), None)
        .await
        .unwrap();
    assert_eq!(cache.get("order:42", None).await.unwrap(), "v");
}

#[tokio::test]
async fn test_json_round_trip() {
    let store = Arc::new(MemoryStore::new());
    let cache = json_cache(&store);

    cache.set("order:42", None, &sample_order(), None).await.unwrap();
    assert_eq!(cache.get("order:42", None).await.unwrap(), sample_order());
}

#[tokio::test]
async fn test_json_helpers_on_raw_cache() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    cache
        .set_json("order:42", None, &sample_order(), None)
        .await
        .unwrap();
    let loaded: Order = cache.get_json("order:42", None).await.unwrap();
    assert_eq!(loaded, sample_order());
}

#[tokio::test]
async fn test_miss_is_recoverable() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    let err = cache.get("never-set", None).await.unwrap_err();
    assert!(err.is_miss());

    cache
        .set("order:42", None, &"v".to_string(), None)
        .await
        .unwrap();
    cache.delete("order:42", None).await.unwrap();
    let err = cache.get("order:42", None).await.unwrap_err();
    assert!(err.is_miss());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    cache
        .set("order:42", None, &"v".to_string(), None)
        .await
        .unwrap();
    cache.delete("order:42", None).await.unwrap();
    cache.delete("order:42", None).await.unwrap();
    cache.delete("never-set", None).await.unwrap();
}

#[tokio::test]
async fn test_ttl_precedence() {
    let store = Arc::new(MemoryStore::new());
    let cache = Cache::<RawCodec>::new(
        Arc::clone(&store) as Arc<dyn CacheStore>,
        "orders",
        "v1",
        CacheOptions {
            ttl: Some(Duration::from_secs(600)),
            ..CacheOptions::default()
        },
    );

    cache
        .set("with-default", None, &"v".to_string(), None)
        .await
        .unwrap();
    cache
        .set(
            "with-override",
            None,
            &"v".to_string(),
            Some(Duration::from_secs(5)),
        )
        .await
        .unwrap();

    let default_ttl = store
        .remaining_ttl(&cache.build_key("with-default", None))
        .unwrap();
    let override_ttl = store
        .remaining_ttl(&cache.build_key("with-override", None))
        .unwrap();

    assert!(default_ttl > Duration::from_secs(590));
    assert!(override_ttl <= Duration::from_secs(5));
}

#[tokio::test]
async fn test_codec_fallback_ttls() {
    let store = Arc::new(MemoryStore::new());
    assert_eq!(raw_cache(&store).ttl(), Duration::from_secs(60));
    assert_eq!(json_cache(&store).ttl(), Duration::from_secs(30));
}

#[tokio::test]
async fn test_user_scoped_entries_are_distinct() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    cache
        .set("order:42", None, &"generic".to_string(), None)
        .await
        .unwrap();
    cache
        .set("order:42", Some("u9"), &"scoped".to_string(), None)
        .await
        .unwrap();

    assert_eq!(cache.get("order:42", None).await.unwrap(), "generic");
    assert_eq!(cache.get("order:42", Some("u9")).await.unwrap(), "scoped");

    cache.delete("order:42", Some("u9")).await.unwrap();
    assert_eq!(cache.get("order:42", None).await.unwrap(), "generic");
    assert!(cache.get("order:42", Some("u9")).await.unwrap_err().is_miss());
}

#[tokio::test]
async fn test_bulk_invalidation_is_scoped_to_record() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    cache
        .set("user:1", None, &"v".to_string(), None)
        .await
        .unwrap();
    cache
        .set("user:1", Some("u9"), &"v".to_string(), None)
        .await
        .unwrap();
    cache
        .set("user:12", None, &"v".to_string(), None)
        .await
        .unwrap();
    cache
        .set("user:2", None, &"v".to_string(), None)
        .await
        .unwrap();

    let deleted = cache.delete_all_by_keyword("user:1").await.unwrap();
    assert_eq!(deleted, 2);

    assert!(cache.get("user:1", None).await.unwrap_err().is_miss());
    assert!(cache.get("user:1", Some("u9")).await.unwrap_err().is_miss());
    assert_eq!(cache.get("user:12", None).await.unwrap(), "v");
    assert_eq!(cache.get("user:2", None).await.unwrap(), "v");
}

#[tokio::test]
async fn test_bulk_invalidation_does_not_cross_cache_types() {
    let store = Arc::new(MemoryStore::new());
    let raw = raw_cache(&store);
    let json = json_cache(&store);

    raw.set("user:1", None, &"v".to_string(), None).await.unwrap();
    json.set("user:1", None, &sample_order(), None).await.unwrap();

    let deleted = raw.delete_all_by_keyword("user:1").await.unwrap();
    assert_eq!(deleted, 1);

    assert!(raw.get("user:1", None).await.unwrap_err().is_miss());
    assert_eq!(json.get("user:1", None).await.unwrap(), sample_order());
}

#[tokio::test]
async fn test_bulk_invalidation_with_no_matches() {
    let store = Arc::new(MemoryStore::new());
    let cache = raw_cache(&store);

    assert_eq!(cache.delete_all_by_keyword("user:1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_or_set_backfills_on_miss() {
    let store = Arc::new(MemoryStore::new());
    let cache = json_cache(&store);

    let value = cache
        .get_or_set("order:42", None, || async { Ok(sample_order()) })
        .await
        .unwrap();
    assert_eq!(value, sample_order());

    // The second read comes from the cache, not the factory.
    let value = cache
        .get_or_set("order:42", None, || async {
            Ok(Order { a: 99, b: vec![] })
        })
        .await
        .unwrap();
    assert_eq!(value, sample_order());
}

#[tokio::test]
async fn test_registry_end_to_end() {
    let store = Arc::new(MemoryStore::new());
    let registry = CacheRegistry::new(Arc::clone(&store) as Arc<dyn CacheStore>, "v1");

    let orders = registry
        .cache_by_key::<JsonCodec<Order>>(
            "orders",
            CacheSpec {
                key_map: HashMap::from([(
                    "by_user".to_string(),
                    "user".to_string(),
                )]),
                ..CacheSpec::default()
            },
        )
        .unwrap();

    assert_eq!(orders.ttl(), REGISTRY_DEFAULT_TTL);
    assert_eq!(orders.key_map().get("by_user").map(String::as_str), Some("user"));

    orders.set("order:42", None, &sample_order(), None).await.unwrap();

    let again = registry
        .cache_by_key::<JsonCodec<Order>>("orders", CacheSpec::default())
        .unwrap();
    assert!(Arc::ptr_eq(&orders, &again));
    assert_eq!(again.get("order:42", None).await.unwrap(), sample_order());
}
