//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Redis的快照缓存。

use super::redis_provider::{DefaultRedisProvider, RedisProvider};
use super::SnapshotCache;
use crate::config::CacheConfig;
use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use std::future::Future;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{debug, instrument};

/// Redis快照缓存
///
/// 快照以普通字符串值保存，不设置过期时间
#[derive(Clone)]
pub struct RedisSnapshotCache {
    manager: ConnectionManager,
    command_timeout_ms: u64,
}

impl std::fmt::Debug for RedisSnapshotCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisSnapshotCache")
            .field("command_timeout_ms", &self.command_timeout_ms)
            .finish()
    }
}

impl RedisSnapshotCache {
    /// 连接Redis并创建快照缓存
    #[instrument(skip(config), level = "info", name = "init_redis_cache")]
    pub async fn connect(config: &CacheConfig) -> Result<Self> {
        Self::connect_with_provider(config, Arc::new(DefaultRedisProvider)).await
    }

    /// 使用指定的Redis提供者创建快照缓存
    pub async fn connect_with_provider(
        config: &CacheConfig,
        provider: Arc<dyn RedisProvider>,
    ) -> Result<Self> {
        let (_client, manager) = provider.connect(config).await?;
        debug!("Redis snapshot cache connected");
        Ok(Self {
            manager,
            command_timeout_ms: config.command_timeout_ms,
        })
    }

    async fn run<T, F>(&self, op: &str, fut: F) -> Result<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match timeout(Duration::from_millis(self.command_timeout_ms), fut).await {
            Ok(result) => result.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout(format!(
                "Redis {} timed out after {}ms",
                op, self.command_timeout_ms
            ))),
        }
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    #[instrument(skip(self), level = "debug")]
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = self.run("GET", conn.get(key)).await?;
        debug!("redis get: key={}, found={}", key, value.is_some());
        Ok(value)
    }

    #[instrument(skip(self, value), level = "debug", fields(value_len = value.len()))]
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = self.run("SET", conn.set(key, value)).await?;
        debug!("redis set: key={}", key);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let removed: i64 = self.run("DEL", conn.del(key)).await?;
        debug!("redis delete: key={}, removed={}", key, removed);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        let response: String = self
            .run("PING", redis::cmd("PING").query_async(&mut conn))
            .await?;
        debug!("redis ping: {}", response);
        Ok(())
    }
}
