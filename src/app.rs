//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块负责按配置创建存储与缓存句柄，并管理它们的生命周期。
//!
//! 所有句柄都在 `App::init` 中显式构造后注入各组件，进程内没有全局连接状态。

use crate::backend::{
    MemorySnapshotCache, RecordStore, RedisSnapshotCache, SeaOrmStore, SnapshotCache,
};
use crate::config::{CacheType, Config};
use crate::error::Result;
use crate::prediction::PredictionProxy;
use crate::serialization::JsonSerializer;
use crate::server::{self, AppState};
use crate::sync::{BootstrapLoader, CsvDataset, RecordSynchronizer, SeedOutcome};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, instrument};

/// 应用实例
pub struct App {
    config: Config,
    store: SeaOrmStore,
    cache: Arc<dyn SnapshotCache>,
    synchronizer: Arc<RecordSynchronizer>,
    bootstrap: BootstrapLoader,
}

impl App {
    /// 初始化应用
    ///
    /// 连接存储并确保表存在，然后连接缓存。任一步骤失败都会中止启动
    #[instrument(skip(config), level = "info")]
    pub async fn init(config: Config) -> Result<Self> {
        let store = SeaOrmStore::connect(&config.database)
            .await?
            .with_insert_chunk(config.bootstrap.batch_size);
        store.ensure_schema().await?;

        let cache: Arc<dyn SnapshotCache> = match config.cache.cache_type {
            CacheType::Redis => Arc::new(RedisSnapshotCache::connect(&config.cache).await?),
            CacheType::Memory => Arc::new(MemorySnapshotCache::new()),
        };
        info!("Cache backend ready: {:?}", config.cache.cache_type);

        Ok(Self::assemble(config, store, cache))
    }

    /// 使用已构造的句柄组装应用
    pub fn assemble(config: Config, store: SeaOrmStore, cache: Arc<dyn SnapshotCache>) -> Self {
        let record_store: Arc<dyn RecordStore> = Arc::new(store.clone());

        let serializer = if config.cache.compress {
            JsonSerializer::with_compression()
        } else {
            JsonSerializer::new()
        };

        let synchronizer = Arc::new(
            RecordSynchronizer::new(
                record_store.clone(),
                cache.clone(),
                config.cache.snapshot_key.clone(),
            )
            .with_serializer(serializer),
        );

        let bootstrap = BootstrapLoader::new(
            record_store,
            Arc::new(CsvDataset::new(config.bootstrap.dataset_path.clone())),
        )
        .with_placeholder_name(config.bootstrap.placeholder_name.clone());

        Self {
            config,
            store,
            cache,
            synchronizer,
            bootstrap,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &SeaOrmStore {
        &self.store
    }

    pub fn cache(&self) -> Arc<dyn SnapshotCache> {
        self.cache.clone()
    }

    pub fn synchronizer(&self) -> Arc<RecordSynchronizer> {
        self.synchronizer.clone()
    }

    /// 执行引导导入
    pub async fn seed(&self) -> Result<SeedOutcome> {
        self.bootstrap.ensure_seeded().await
    }

    /// 构建HTTP路由
    pub fn router(&self) -> Result<Router> {
        let predictor = Arc::new(PredictionProxy::new(&self.config.prediction)?);
        Ok(server::create_router(AppState {
            synchronizer: self.synchronizer.clone(),
            predictor,
        }))
    }

    /// 运行服务直到 `shutdown` 完成
    ///
    /// 启用引导导入时先执行一次；导入失败只记录日志，服务照常启动，下次启动会重试
    pub async fn serve<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.config.bootstrap.enabled {
            match self.seed().await {
                Ok(outcome) => info!("Bootstrap finished: {:?}", outcome),
                Err(e) => error!("Bootstrap failed, store left unseeded: {}", e),
            }
        }

        let router = self.router()?;
        let listener = TcpListener::bind(self.config.server.bind_address()).await?;
        server::serve(listener, router, shutdown).await
    }

    /// 关闭数据库连接池
    pub async fn shutdown(self) -> Result<()> {
        info!("Shutting down");
        self.store.close().await
    }
}
