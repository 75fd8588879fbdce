//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了持久化存储与缓存的适配器接口及其实现。

pub mod memory;
pub mod redis_cache;
pub mod redis_provider;
pub mod store;

use crate::error::Result;
use crate::model::{NewStudent, StudentRecord, StudentUpdate};
use async_trait::async_trait;

pub use memory::MemorySnapshotCache;
pub use redis_cache::RedisSnapshotCache;
pub use store::SeaOrmStore;

/// 持久化存储适配器
///
/// 权威数据源，单条记录的更新由底层存储保证原子性
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 查询全部记录
    async fn find_all(&self) -> Result<Vec<StudentRecord>>;

    /// 按标识更新记录并返回更新后的记录
    ///
    /// # 返回值
    ///
    /// 记录不存在时返回None，且不修改任何数据
    async fn find_by_id_and_update(
        &self,
        id: i32,
        update: &StudentUpdate,
    ) -> Result<Option<StudentRecord>>;

    /// 批量插入记录，要么全部成功要么全部不写入
    ///
    /// # 返回值
    ///
    /// 返回插入的记录数
    async fn insert_many(&self, records: Vec<NewStudent>) -> Result<u64>;

    /// 统计记录数
    async fn count(&self) -> Result<u64>;
}

/// 快照缓存适配器
///
/// 单个键值槽位，保存全量记录的序列化快照，没有过期策略
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    /// 读取快照，不存在时返回None
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// 写入快照
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()>;

    /// 删除快照，键不存在时同样视为成功
    async fn delete(&self, key: &str) -> Result<()>;

    /// 检查连接是否正常
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
