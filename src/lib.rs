//! scorecache - 学生成绩记录服务
//!
//! 以持久化存储为权威数据源，通过单键全量快照实现缓存旁路读取与写后失效，
//! 启动时从外部数据集幂等导入一次数据，并代理成绩预测请求。

pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod prediction;
pub mod serialization;
pub mod server;
pub mod sync;
pub mod telemetry;
pub mod utils;

// Re-export commonly used items
pub use app::App;
pub use backend::{RecordStore, SnapshotCache};
pub use config::Config;
pub use error::{Result, ServiceError};
pub use model::{NewStudent, StudentRecord, StudentUpdate};
pub use sync::{BootstrapLoader, RecordSynchronizer, SeedOutcome};
