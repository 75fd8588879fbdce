//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 记录同步器集成测试

#[path = "../common/mod.rs"]
mod common;

use common::{record, CountingStore, FakeCache};
use scorecache::error::ServiceError;
use scorecache::model::StudentUpdate;
use scorecache::sync::RecordSynchronizer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

const KEY: &str = "students";

fn build(store: Arc<CountingStore>, cache: Arc<FakeCache>) -> RecordSynchronizer {
    RecordSynchronizer::new(store, cache, KEY)
}

/// 测试冷缓存读取后第二次读取命中缓存
///
/// 第一次读取回源存储并回填快照，第二次读取不再访问存储
#[tokio::test]
async fn test_second_read_served_from_cache() {
    common::setup_logging();

    let records = vec![
        record(1, "A", 5.0, 90.0, 70.0),
        record(2, "B", 3.0, 75.0, 60.0),
    ];
    let store = Arc::new(CountingStore::with_records(records.clone()));
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    let first = sync.get_all().await.unwrap();
    assert_eq!(first, records);
    assert_eq!(store.find_all_count(), 1);
    assert_eq!(cache.cached_records(KEY), Some(records.clone()));

    let second = sync.get_all().await.unwrap();
    assert_eq!(second, records);
    assert_eq!(store.find_all_count(), 1, "cache hit must not touch the store");

    let stats = sync.stats();
    assert_eq!(stats.cache_misses, 1);
    assert_eq!(stats.cache_hits, 1);
}

/// 测试空集合同样被缓存
#[tokio::test]
async fn test_empty_collection_is_cached() {
    let store = Arc::new(CountingStore::new());
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    assert!(sync.get_all().await.unwrap().is_empty());
    assert_eq!(cache.raw(KEY), Some(b"[]".to_vec()));

    assert!(sync.get_all().await.unwrap().is_empty());
    assert_eq!(store.find_all_count(), 1);
}

/// 测试完整的读-写-读流程
///
/// 更新后快照被删除，下一次读取回源存储并返回新值
#[tokio::test]
async fn test_read_update_read_scenario() {
    common::setup_logging();

    let store = Arc::new(CountingStore::with_records(vec![record(
        1, "A", 5.0, 90.0, 70.0,
    )]));
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    let before = sync.get_all().await.unwrap();
    assert_eq!(before[0].score, 70.0);
    assert!(cache.raw(KEY).is_some());

    let updated = sync
        .update_one(
            1,
            StudentUpdate {
                score: Some(85.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.score, 85.0);
    assert_eq!(updated.name, "A");
    assert!(cache.raw(KEY).is_none(), "update must delete the snapshot");

    let after = sync.get_all().await.unwrap();
    assert_eq!(after, vec![record(1, "A", 5.0, 90.0, 85.0)]);
    assert_eq!(store.find_all_count(), 2);
    assert_eq!(cache.cached_records(KEY).unwrap()[0].score, 85.0);
}

/// 测试连续多次更新后读取不会返回任一旧值
#[tokio::test]
async fn test_sequential_updates_never_return_stale_values() {
    let store = Arc::new(CountingStore::with_records(vec![
        record(1, "A", 5.0, 90.0, 70.0),
        record(2, "B", 2.0, 60.0, 50.0),
    ]));
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    for score in [71.0, 72.0, 73.0] {
        sync.get_all().await.unwrap();
        sync.update_one(
            2,
            StudentUpdate {
                score: Some(score),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let records = sync.get_all().await.unwrap();
        let b = records.iter().find(|r| r.id == 2).unwrap();
        assert_eq!(b.score, score);
    }
    assert_eq!(sync.stats().invalidations, 3);
}

/// 测试更新不存在的记录
///
/// 返回 NotFound，存储与缓存都保持不变
#[tokio::test]
async fn test_update_missing_record_leaves_state_unchanged() {
    let records = vec![record(1, "A", 5.0, 90.0, 70.0)];
    let store = Arc::new(CountingStore::with_records(records.clone()));
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    sync.get_all().await.unwrap();
    let cached_before = cache.raw(KEY);

    let err = sync
        .update_one(
            42,
            StudentUpdate {
                score: Some(99.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(store.snapshot(), records);
    assert_eq!(cache.raw(KEY), cached_before);
    assert_eq!(cache.delete_calls.load(Ordering::SeqCst), 0);
}

/// 测试缓存读取出错时回源存储
#[tokio::test]
async fn test_cache_get_error_falls_back_to_store() {
    common::setup_logging();

    let records = vec![record(1, "A", 5.0, 90.0, 70.0)];
    let store = Arc::new(CountingStore::with_records(records.clone()));
    let cache = Arc::new(FakeCache::new());
    cache.fail_get.store(true, Ordering::SeqCst);
    let sync = build(store.clone(), cache.clone());

    let result = sync.get_all().await.unwrap();
    assert_eq!(result, records);
    assert_eq!(store.find_all_count(), 1);
    assert_eq!(sync.stats().cache_errors, 1);
}

/// 测试无法解析的快照按未命中处理并被覆盖
#[tokio::test]
async fn test_corrupt_snapshot_is_replaced() {
    let records = vec![record(1, "A", 5.0, 90.0, 70.0)];
    let store = Arc::new(CountingStore::with_records(records.clone()));
    let cache = Arc::new(FakeCache::new());
    cache.put_raw(KEY, b"{not json");
    let sync = build(store.clone(), cache.clone());

    assert_eq!(sync.get_all().await.unwrap(), records);
    assert_eq!(store.find_all_count(), 1);
    assert_eq!(cache.cached_records(KEY), Some(records));
}

/// 测试缓存写入失败不影响读取结果
#[tokio::test]
async fn test_cache_set_error_is_not_fatal() {
    let records = vec![record(1, "A", 5.0, 90.0, 70.0)];
    let store = Arc::new(CountingStore::with_records(records.clone()));
    let cache = Arc::new(FakeCache::new());
    cache.fail_set.store(true, Ordering::SeqCst);
    let sync = build(store.clone(), cache.clone());

    assert_eq!(sync.get_all().await.unwrap(), records);
    assert_eq!(sync.get_all().await.unwrap(), records);
    // 每次都回源，因为快照始终写不进去
    assert_eq!(store.find_all_count(), 2);
}

/// 测试缓存删除失败时更新仍然成功
#[tokio::test]
async fn test_cache_delete_error_does_not_fail_update() {
    let store = Arc::new(CountingStore::with_records(vec![record(
        1, "A", 5.0, 90.0, 70.0,
    )]));
    let cache = Arc::new(FakeCache::new());
    cache.fail_delete.store(true, Ordering::SeqCst);
    let sync = build(store.clone(), cache.clone());

    let updated = sync
        .update_one(
            1,
            StudentUpdate {
                name: Some("Alice".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice");
    assert_eq!(store.snapshot()[0].name, "Alice");
    assert_eq!(sync.stats().cache_errors, 1);
    assert_eq!(sync.stats().invalidations, 0);
}

/// 测试存储读取失败时返回 RetrievalFailure 且不写缓存
#[tokio::test]
async fn test_store_failure_is_retrieval_failure() {
    let store = Arc::new(CountingStore::new());
    store.fail_reads.store(true, Ordering::SeqCst);
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    let err = sync.get_all().await.unwrap_err();
    assert!(matches!(err, ServiceError::RetrievalFailure(_)));
    assert_eq!(cache.set_calls.load(Ordering::SeqCst), 0);
    assert!(cache.raw(KEY).is_none());
}

/// 测试显式失效
#[tokio::test]
async fn test_explicit_invalidate() {
    let store = Arc::new(CountingStore::with_records(vec![record(
        1, "A", 5.0, 90.0, 70.0,
    )]));
    let cache = Arc::new(FakeCache::new());
    let sync = build(store.clone(), cache.clone());

    sync.get_all().await.unwrap();
    assert!(cache.raw(KEY).is_some());

    sync.invalidate().await.unwrap();
    assert!(cache.raw(KEY).is_none());

    cache.fail_delete.store(true, Ordering::SeqCst);
    assert!(sync.invalidate().await.is_err());
}

/// 测试并发读取全部成功且结果一致
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads() {
    let records: Vec<_> = (1..=20)
        .map(|i| record(i, "Unknown", i as f64, 80.0, 50.0 + i as f64))
        .collect();
    let store = Arc::new(CountingStore::with_records(records.clone()));
    let cache = Arc::new(FakeCache::new());
    let sync = Arc::new(build(store.clone(), cache.clone()));

    let mut handles = Vec::new();
    for _ in 0..16 {
        let sync = sync.clone();
        handles.push(tokio::spawn(async move { sync.get_all().await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), records);
    }

    let stats = sync.stats();
    assert_eq!(stats.cache_hits + stats.cache_misses, 16);
    assert_eq!(store.find_all_count() as u64, stats.cache_misses);
}
