//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了记录同步器，负责缓存旁路读取与写后失效。
//!
//! 读取：先查快照，未命中或缓存出错时回源存储，并尽力回填快照。
//! 写入：直接更新存储，成功后整体删除快照，从不增量修补。
//!
//! 并发下存在已知窗口：一次读取若在更新之前拿到旧数据、在删除快照之后才回填，
//! 旧快照会保留到下一次写入。这里不加锁，保持这一行为。

use crate::backend::{RecordStore, SnapshotCache};
use crate::error::{Result, ServiceError};
use crate::model::{StudentRecord, StudentUpdate};
use crate::serialization::{JsonSerializer, Serializer};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// 默认快照键
pub const DEFAULT_SNAPSHOT_KEY: &str = "students";

/// 同步器运行计数
#[derive(Debug, Default)]
struct SyncCounters {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    cache_errors: AtomicU64,
    invalidations: AtomicU64,
}

/// 同步器运行计数快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_errors: u64,
    pub invalidations: u64,
}

/// 记录同步器
pub struct RecordSynchronizer {
    store: Arc<dyn RecordStore>,
    cache: Arc<dyn SnapshotCache>,
    snapshot_key: String,
    serializer: JsonSerializer,
    counters: SyncCounters,
}

impl std::fmt::Debug for RecordSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordSynchronizer")
            .field("snapshot_key", &self.snapshot_key)
            .field("stats", &self.stats())
            .finish()
    }
}

impl RecordSynchronizer {
    /// 创建新的记录同步器
    ///
    /// # 参数
    ///
    /// * `store` - 持久化存储适配器
    /// * `cache` - 快照缓存适配器
    /// * `snapshot_key` - 保存全量快照的固定键
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<dyn SnapshotCache>,
        snapshot_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            cache,
            snapshot_key: snapshot_key.into(),
            serializer: JsonSerializer::new(),
            counters: SyncCounters::default(),
        }
    }

    /// 指定快照序列化器
    pub fn with_serializer(mut self, serializer: JsonSerializer) -> Self {
        self.serializer = serializer;
        self
    }

    /// 快照键
    pub fn snapshot_key(&self) -> &str {
        &self.snapshot_key
    }

    /// 读取全部记录
    ///
    /// 缓存命中时不访问存储；缓存缺失、读取失败或快照无法解析时回源存储。
    ///
    /// # 错误
    ///
    /// 存储读取失败时返回 `RetrievalFailure`，此时不触碰缓存
    #[instrument(skip(self), level = "debug", fields(key = %self.snapshot_key))]
    pub async fn get_all(&self) -> Result<Vec<StudentRecord>> {
        if let Some(records) = self.read_snapshot().await {
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            info!("Served {} student records from cache", records.len());
            return Ok(records);
        }
        self.counters.cache_misses.fetch_add(1, Ordering::Relaxed);

        let records = self.store.find_all().await.map_err(|e| {
            error!("Failed to fetch student records from store: {}", e);
            match e {
                ServiceError::RetrievalFailure(_) => e,
                other => ServiceError::RetrievalFailure(other.to_string()),
            }
        })?;
        info!("Served {} student records from store", records.len());

        self.write_snapshot(&records).await;
        Ok(records)
    }

    /// 更新单条记录
    ///
    /// 存储更新成功后整体删除快照；删除失败只记录日志。
    ///
    /// # 错误
    ///
    /// 记录不存在时返回 `NotFound`，缓存保持不变；存储错误原样返回
    #[instrument(skip(self, update), level = "debug", fields(key = %self.snapshot_key))]
    pub async fn update_one(&self, id: i32, update: StudentUpdate) -> Result<StudentRecord> {
        let updated = self
            .store
            .find_by_id_and_update(id, &update)
            .await
            .map_err(|e| {
                error!("Failed to update student record {}: {}", id, e);
                e
            })?;

        let Some(record) = updated else {
            debug!("Student {} not found, cache left untouched", id);
            return Err(ServiceError::NotFound(format!("student {}", id)));
        };

        if let Err(e) = self.invalidate().await {
            self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
            warn!(
                "Failed to invalidate cache after updating student {}: {}",
                id, e
            );
        }

        info!("Updated student record {}", id);
        Ok(record)
    }

    /// 删除快照
    ///
    /// 与读写路径不同，缓存错误直接返回给调用者
    #[instrument(skip(self), level = "debug", fields(key = %self.snapshot_key))]
    pub async fn invalidate(&self) -> Result<()> {
        self.cache.delete(&self.snapshot_key).await?;
        self.counters.invalidations.fetch_add(1, Ordering::Relaxed);
        debug!("Cache snapshot invalidated");
        Ok(())
    }

    /// 获取运行计数
    pub fn stats(&self) -> SyncStats {
        SyncStats {
            cache_hits: self.counters.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.counters.cache_misses.load(Ordering::Relaxed),
            cache_errors: self.counters.cache_errors.load(Ordering::Relaxed),
            invalidations: self.counters.invalidations.load(Ordering::Relaxed),
        }
    }

    async fn read_snapshot(&self) -> Option<Vec<StudentRecord>> {
        match self.cache.get(&self.snapshot_key).await {
            Ok(Some(bytes)) => match self.serializer.deserialize::<Vec<StudentRecord>>(&bytes) {
                Ok(records) => Some(records),
                Err(e) => {
                    self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
                    warn!("Discarding undecodable cache snapshot: {}", e);
                    None
                }
            },
            Ok(None) => {
                debug!("Cache miss");
                None
            }
            Err(e) => {
                self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
                warn!("Cache read failed, falling back to store: {}", e);
                None
            }
        }
    }

    async fn write_snapshot(&self, records: &[StudentRecord]) {
        let bytes = match self.serializer.serialize(&records) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to serialize cache snapshot: {}", e);
                return;
            }
        };

        match self.cache.set(&self.snapshot_key, bytes).await {
            Ok(()) => debug!("Stored {} records in cache", records.len()),
            Err(e) => {
                self.counters.cache_errors.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to store records in cache: {}", e);
            }
        }
    }
}
