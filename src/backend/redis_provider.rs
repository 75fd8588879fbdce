//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了Redis连接提供者接口和默认实现。

use crate::config::CacheConfig;
use crate::error::{Result, ServiceError};
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use secrecy::ExposeSecret;
use tokio::time::{timeout, Duration};

/// Redis连接提供者
///
/// 负责根据配置建立连接，连接建立之后的重连由 ConnectionManager 处理
#[async_trait]
pub trait RedisProvider: Send + Sync {
    async fn connect(&self, config: &CacheConfig) -> Result<(Client, ConnectionManager)>;
}

pub struct DefaultRedisProvider;

/// 根据 TLS 开关调整连接字符串的协议前缀
pub fn effective_connection_string(config: &CacheConfig) -> String {
    let raw = config.connection_string.expose_secret();
    if config.enable_tls && !raw.starts_with("rediss://") {
        raw.replace("redis://", "rediss://")
    } else {
        raw.to_string()
    }
}

#[async_trait]
impl RedisProvider for DefaultRedisProvider {
    async fn connect(&self, config: &CacheConfig) -> Result<(Client, ConnectionManager)> {
        let connection_string = effective_connection_string(config);
        let client = Client::open(connection_string.as_str())?;

        let manager = timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        .map_err(|_| {
            ServiceError::CacheFailure(format!(
                "Connection timed out after {}ms. Target: {}",
                config.connection_timeout_ms,
                redact_connection_string(&connection_string)
            ))
        })??;

        Ok((client, manager))
    }
}
