//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了学生成绩服务的错误类型和处理机制。

use thiserror::Error;

/// 服务错误类型枚举
///
/// 前四个变体构成同步核心的错误分类，其余变体来自具体的存储、缓存与外部依赖
#[derive(Error, Debug)]
pub enum ServiceError {
    /// 更新目标记录不存在
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 持久化存储读取失败
    #[error("Retrieval failed: {0}")]
    RetrievalFailure(String),

    /// 缓存操作失败（在同步器内部总是被吞掉）
    #[error("Cache operation failed: {0}")]
    CacheFailure(String),

    /// 引导数据集不可读或格式错误
    #[error("Dataset load failed: {0}")]
    LoadFailure(String),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 请求参数错误
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Sea-ORM数据库错误
    #[error("Sea-ORM error: {0}")]
    SeaOrmError(#[from] sea_orm::DbErr),

    /// 数据库连接错误
    #[error("Database connection error: {0}")]
    DatabaseError(String),

    /// Redis错误
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 预测服务调用失败
    #[error("Prediction service error: {0}")]
    PredictionError(String),

    /// 超时错误
    #[error("Timeout error: {0}")]
    Timeout(String),
}

/// 服务操作结果类型别名
pub type Result<T> = std::result::Result<T, ServiceError>;
