use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tomato_cache::{Cache, CacheLookup, CacheStore, MemoryStore, GENERIC_CACHE_TTL_SECS};

fn new_cache() -> (Cache, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (Cache::new(store.clone(), GENERIC_CACHE_TTL_SECS), store)
}

// The spec scenario: a cold xueqiu fetch returns the live stock list and
// leaves it cached; a second call inside the window never touches upstream.
#[tokio::test]
async fn xueqiu_cold_then_warm_round_trip() {
    let (cache, store) = new_cache();
    let upstream_calls = AtomicUsize::new(0);

    let fetch_stocks = || async {
        upstream_calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!([
            {"symbol": "TSLA", "pct": 3.2},
            {"symbol": "BABA", "pct": -1.1},
        ]))
    };

    let live: Value = cache
        .fetch_with_cache("xueqiu", fetch_stocks, Some(300))
        .await
        .unwrap();
    assert_eq!(live[0]["symbol"], "TSLA");
    assert_eq!(upstream_calls.load(Ordering::SeqCst), 1);

    // The store now holds the serialized list under the fixed key convention.
    let raw = store.get("news:xueqiu").await.unwrap().unwrap();
    let stored: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored, live);

    let cached: Value = cache
        .fetch_with_cache(
            "xueqiu",
            || async {
                upstream_calls.fetch_add(1, Ordering::SeqCst);
                Ok(json!("should not run"))
            },
            Some(300),
        )
        .await
        .unwrap();
    assert_eq!(cached, live);
    assert_eq!(upstream_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn values_survive_json_round_trip_through_the_store() {
    let (cache, _store) = new_cache();
    let payload = json!({
        "updateTime": "2026-08-27T09:00:00Z",
        "list": [{"title": "hot item", "heat": 120345}],
    });

    cache
        .set_ex("news:zhihu", &payload, Some(180))
        .await
        .unwrap();
    match cache.get_json::<Value>("news:zhihu").await {
        CacheLookup::Hit(v) => assert_eq!(v, payload),
        other => panic!("expected hit, got {:?}", other),
    }
}

#[tokio::test]
async fn expired_entries_read_as_miss_and_trigger_refetch() {
    let (cache, _store) = new_cache();

    cache
        .set_ex("news:weibo", &json!(["old"]), Some(0))
        .await
        .unwrap();
    assert_eq!(cache.get_json::<Value>("news:weibo").await, CacheLookup::Miss);

    let refreshed: Value = cache
        .fetch_with_cache("weibo", || async { Ok(json!(["new"])) }, Some(60))
        .await
        .unwrap();
    assert_eq!(refreshed, json!(["new"]));
}
