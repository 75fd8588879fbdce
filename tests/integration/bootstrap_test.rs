//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 引导导入测试

#[path = "../common/mod.rs"]
mod common;

use common::{record, CountingStore, StaticDataset};
use scorecache::error::ServiceError;
use scorecache::sync::{BootstrapLoader, CsvDataset, DatasetRow, SeedOutcome};
use std::io::Write;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn row(study_hours: f64, attendance: f64, score: f64) -> DatasetRow {
    DatasetRow {
        study_hours,
        attendance,
        score,
    }
}

/// 测试空存储从CSV导入，姓名使用占位值
#[tokio::test]
async fn test_seed_empty_store_from_csv() {
    common::setup_logging();

    let file = write_csv("StudyHours,Attendance,Score\n5,90,70\n3,75,60\n8.5,98,91\n");
    let store = Arc::new(CountingStore::new());
    let loader = BootstrapLoader::new(store.clone(), Arc::new(CsvDataset::new(file.path())));

    let outcome = loader.ensure_seeded().await.unwrap();
    assert_eq!(outcome, SeedOutcome::Seeded { inserted: 3 });

    let records = store.snapshot();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.name == "Unknown"));
    assert_eq!(records[2], record(3, "Unknown", 8.5, 98.0, 91.0));
    assert_eq!(store.insert_many_count(), 1);
}

/// 测试重复执行不会重复导入
#[tokio::test]
async fn test_seed_is_idempotent() {
    let store = Arc::new(CountingStore::new());
    let dataset = Arc::new(StaticDataset::new(vec![row(5.0, 90.0, 70.0), row(2.0, 60.0, 45.0)]));
    let loader = BootstrapLoader::new(store.clone(), dataset.clone());

    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::Seeded { inserted: 2 }
    );
    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::AlreadySeeded { existing: 2 }
    );
    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::AlreadySeeded { existing: 2 }
    );

    assert_eq!(store.snapshot().len(), 2);
    assert_eq!(store.insert_many_count(), 1);
    // 已有数据时不读取数据集
    assert_eq!(dataset.reads.load(Ordering::SeqCst), 1);
}

/// 测试非空存储即使内容与数据集不同也不导入
#[tokio::test]
async fn test_existing_data_is_never_overwritten() {
    let store = Arc::new(CountingStore::with_records(vec![record(
        1, "Alice", 4.0, 88.0, 77.0,
    )]));
    let dataset = Arc::new(StaticDataset::new(vec![row(5.0, 90.0, 70.0)]));
    let loader = BootstrapLoader::new(store.clone(), dataset.clone());

    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::AlreadySeeded { existing: 1 }
    );
    assert_eq!(store.snapshot(), vec![record(1, "Alice", 4.0, 88.0, 77.0)]);
    assert_eq!(dataset.reads.load(Ordering::SeqCst), 0);
}

/// 测试格式错误的行导致整体失败，修复后可重试
#[tokio::test]
async fn test_malformed_row_fails_whole_batch_and_retry_succeeds() {
    common::setup_logging();

    let file = write_csv("StudyHours,Attendance,Score\n5,90,70\nabc,80,60\n");
    let store = Arc::new(CountingStore::new());
    let loader = BootstrapLoader::new(store.clone(), Arc::new(CsvDataset::new(file.path())));

    let err = loader.ensure_seeded().await.unwrap_err();
    assert!(matches!(err, ServiceError::LoadFailure(_)));
    assert!(err.to_string().contains("abc"));
    assert!(store.snapshot().is_empty());
    assert_eq!(store.insert_many_count(), 0);

    std::fs::write(file.path(), "StudyHours,Attendance,Score\n5,90,70\n6,80,60\n").unwrap();

    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::Seeded { inserted: 2 }
    );
    assert_eq!(store.snapshot().len(), 2);
}

/// 测试数据集文件不存在
#[tokio::test]
async fn test_missing_dataset_is_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(CountingStore::new());
    let loader = BootstrapLoader::new(
        store.clone(),
        Arc::new(CsvDataset::new(dir.path().join("missing.csv"))),
    );

    let err = loader.ensure_seeded().await.unwrap_err();
    assert!(matches!(err, ServiceError::LoadFailure(_)));
    assert_eq!(store.insert_many_count(), 0);
}

/// 测试只有表头的数据集
#[tokio::test]
async fn test_empty_dataset_inserts_nothing() {
    let file = write_csv("StudyHours,Attendance,Score\n");
    let store = Arc::new(CountingStore::new());
    let loader = BootstrapLoader::new(store.clone(), Arc::new(CsvDataset::new(file.path())));

    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::Seeded { inserted: 0 }
    );
    assert_eq!(store.insert_many_count(), 0);
}

/// 测试存储不可用时的错误类型
#[tokio::test]
async fn test_store_unavailable_is_retrieval_failure() {
    let store = Arc::new(CountingStore::new());
    store.fail_reads.store(true, Ordering::SeqCst);
    let dataset = Arc::new(StaticDataset::new(vec![row(5.0, 90.0, 70.0)]));
    let loader = BootstrapLoader::new(store.clone(), dataset.clone());

    let err = loader.ensure_seeded().await.unwrap_err();
    assert!(matches!(err, ServiceError::RetrievalFailure(_)));
    assert_eq!(dataset.reads.load(Ordering::SeqCst), 0);
}

/// 测试插入失败时错误原样返回，下次仍会重试
#[tokio::test]
async fn test_insert_failure_propagates() {
    let store = Arc::new(CountingStore::new());
    store.fail_inserts.store(true, Ordering::SeqCst);
    let dataset = Arc::new(StaticDataset::new(vec![row(5.0, 90.0, 70.0)]));
    let loader = BootstrapLoader::new(store.clone(), dataset);

    assert!(loader.ensure_seeded().await.is_err());
    assert!(store.snapshot().is_empty());

    store.fail_inserts.store(false, Ordering::SeqCst);
    assert_eq!(
        loader.ensure_seeded().await.unwrap(),
        SeedOutcome::Seeded { inserted: 1 }
    );
}

/// 测试自定义占位姓名
#[tokio::test]
async fn test_custom_placeholder_name() {
    let store = Arc::new(CountingStore::new());
    let dataset = Arc::new(StaticDataset::new(vec![row(1.0, 50.0, 30.0)]));
    let loader = BootstrapLoader::new(store.clone(), dataset).with_placeholder_name("N/A");

    loader.ensure_seeded().await.unwrap();
    assert_eq!(store.snapshot()[0].name, "N/A");
}
