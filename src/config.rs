//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了服务的配置结构和解析逻辑。

use crate::error::{Result, ServiceError};
use crate::sync::{DEFAULT_SNAPSHOT_KEY, PLACEHOLDER_NAME};
use crate::utils::validate_snapshot_key;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// 默认配置文件名，不存在时使用内置默认值
pub const DEFAULT_CONFIG_FILE: &str = "scorecache.toml";

/// 服务配置
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 默认日志级别，`RUST_LOG` 优先
    pub log_level: String,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub bootstrap: BootstrapConfig,
    pub prediction: PredictionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            cache: CacheConfig::default(),
            bootstrap: BootstrapConfig::default(),
            prediction: PredictionConfig::default(),
        }
    }
}

/// HTTP服务配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    /// 监听地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 持久化存储配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 数据库连接字符串（sqlite / postgres / mysql）
    pub url: SecretString,
    /// 连接池最大连接数
    pub max_connections: u32,
    /// 连接超时时间（秒）
    pub connect_timeout_secs: u64,
    /// 是否输出 sqlx 语句日志
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: SecretString::new("sqlite://student_db.sqlite?mode=rwc".to_string().into()),
            max_connections: 10,
            connect_timeout_secs: 30,
            sqlx_logging: false,
        }
    }
}

/// 缓存后端类型
#[derive(Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// Redis 单键快照
    #[default]
    Redis,
    /// 进程内快照（单实例部署或测试）
    Memory,
}

/// 缓存配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheConfig {
    pub cache_type: CacheType,
    /// Redis 连接字符串
    pub connection_string: SecretString,
    /// 连接超时时间（毫秒）
    pub connection_timeout_ms: u64,
    /// 命令执行超时时间（毫秒）
    pub command_timeout_ms: u64,
    /// 是否启用 TLS
    pub enable_tls: bool,
    /// 保存全量快照的固定键
    pub snapshot_key: String,
    /// 是否对快照进行 gzip 压缩
    pub compress: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Redis,
            connection_string: SecretString::new("redis://localhost:6379".to_string().into()),
            connection_timeout_ms: 5000,
            command_timeout_ms: 3000,
            enable_tls: false,
            snapshot_key: DEFAULT_SNAPSHOT_KEY.to_string(),
            compress: false,
        }
    }
}

/// 引导导入配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct BootstrapConfig {
    /// 启动时是否执行引导导入
    pub enabled: bool,
    /// CSV 数据集路径
    pub dataset_path: PathBuf,
    /// 导入记录使用的占位姓名
    pub placeholder_name: String,
    /// 单条 INSERT 语句包含的行数（整体仍在同一事务内）
    pub batch_size: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dataset_path: PathBuf::from("../fastapi_app/Student_performance_dataset.csv"),
            placeholder_name: PLACEHOLDER_NAME.to_string(),
            batch_size: 500,
        }
    }
}

/// 预测代理配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PredictionConfig {
    /// 外部预测服务地址
    pub endpoint: String,
    /// 请求超时时间（毫秒）
    pub timeout_ms: u64,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8000/predict".to_string(),
            timeout_ms: 10000,
        }
    }
}

impl Config {
    /// 从TOML文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// 从TOML字符串解析配置并验证
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ServiceError::ConfigError(e.to_string()))?;
        config.validate().map_err(ServiceError::ConfigError)?;
        Ok(config)
    }

    /// 加载配置
    ///
    /// 显式指定的路径必须存在；未指定时尝试默认文件，不存在则使用默认值
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有值都在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port cannot be zero".to_string());
        }

        if self.database.max_connections == 0 {
            return Err("database.max_connections cannot be zero".to_string());
        }

        validate_snapshot_key(&self.cache.snapshot_key)
            .map_err(|e| format!("cache.snapshot_key is invalid: {}", e))?;

        let timeout = self.cache.connection_timeout_ms;
        if !(100..=30000).contains(&timeout) {
            return Err("cache.connection_timeout_ms must be between 100 and 30000 ms".to_string());
        }

        let timeout = self.cache.command_timeout_ms;
        if !(100..=60000).contains(&timeout) {
            return Err("cache.command_timeout_ms must be between 100 and 60000 ms".to_string());
        }

        if self.bootstrap.batch_size == 0 {
            return Err("bootstrap.batch_size cannot be zero".to_string());
        }

        if self.bootstrap.placeholder_name.is_empty() {
            return Err("bootstrap.placeholder_name cannot be empty".to_string());
        }

        if self.prediction.endpoint.is_empty() {
            return Err("prediction.endpoint cannot be empty".to_string());
        }

        if self.prediction.timeout_ms == 0 {
            return Err("prediction.timeout_ms cannot be zero".to_string());
        }

        Ok(())
    }
}
