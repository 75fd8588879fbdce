//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了进程内快照缓存，基于Moka实现。

use super::SnapshotCache;
use crate::error::Result;
use async_trait::async_trait;
use moka::future::Cache;
use tracing::{debug, instrument};

/// 进程内快照缓存
///
/// 仅适用于单实例部署，没有容量淘汰之外的过期策略
#[derive(Clone)]
pub struct MemorySnapshotCache {
    cache: Cache<String, Vec<u8>>,
}

impl std::fmt::Debug for MemorySnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySnapshotCache")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl MemorySnapshotCache {
    /// 创建新的进程内快照缓存
    pub fn new() -> Self {
        Self {
            // 只存放少量固定键
            cache: Cache::builder().max_capacity(64).build(),
        }
    }
}

impl Default for MemorySnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SnapshotCache for MemorySnapshotCache {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.cache.get(key).await;
        debug!("memory get: key={}, found={}", key, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.cache.insert(key.to_string(), value).await;
        debug!("memory set: key={}", key);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        debug!("memory delete: key={}", key);
        Ok(())
    }
}
