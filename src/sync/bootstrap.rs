//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了引导导入器，仅在存储为空时从外部数据集导入一次数据。

use super::dataset::DatasetSource;
use crate::backend::RecordStore;
use crate::error::{Result, ServiceError};
use crate::model::NewStudent;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// 默认占位姓名，数据集不含姓名列
pub const PLACEHOLDER_NAME: &str = "Unknown";

/// 引导导入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// 存储已有数据，未执行导入
    AlreadySeeded { existing: u64 },
    /// 已导入
    Seeded { inserted: u64 },
}

/// 引导导入器
///
/// 幂等性只依据记录数判断，不比较内容或版本
pub struct BootstrapLoader {
    store: Arc<dyn RecordStore>,
    dataset: Arc<dyn DatasetSource>,
    placeholder_name: String,
}

impl BootstrapLoader {
    pub fn new(store: Arc<dyn RecordStore>, dataset: Arc<dyn DatasetSource>) -> Self {
        Self {
            store,
            dataset,
            placeholder_name: PLACEHOLDER_NAME.to_string(),
        }
    }

    /// 指定导入记录使用的占位姓名
    pub fn with_placeholder_name(mut self, name: impl Into<String>) -> Self {
        self.placeholder_name = name.into();
        self
    }

    /// 确保存储已导入数据
    ///
    /// 存储非空时不做任何事；为空时读取整个数据集并一次性批量插入。
    ///
    /// # 错误
    ///
    /// 数据集不可读或任意一行格式错误时返回 `LoadFailure`，存储保持为空，可安全重试
    #[instrument(skip(self), level = "info", fields(dataset = %self.dataset.describe()))]
    pub async fn ensure_seeded(&self) -> Result<SeedOutcome> {
        let existing = self.store.count().await.map_err(|e| {
            error!("Error checking data existence: {}", e);
            ServiceError::RetrievalFailure(e.to_string())
        })?;

        if existing > 0 {
            info!(
                "Data already exists in store ({} records), skipping dataset load",
                existing
            );
            return Ok(SeedOutcome::AlreadySeeded { existing });
        }

        info!("No data found in store, loading from dataset");
        let rows = self.dataset.read_rows().await.map_err(|e| {
            error!("Failed to read dataset: {}", e);
            match e {
                ServiceError::LoadFailure(_) => e,
                other => ServiceError::LoadFailure(other.to_string()),
            }
        })?;

        if rows.is_empty() {
            warn!("Dataset is empty, nothing to seed");
            return Ok(SeedOutcome::Seeded { inserted: 0 });
        }

        let records: Vec<NewStudent> = rows
            .into_iter()
            .map(|row| NewStudent {
                name: self.placeholder_name.clone(),
                study_hours: row.study_hours,
                attendance: row.attendance,
                score: row.score,
            })
            .collect();

        let inserted = self.store.insert_many(records).await.map_err(|e| {
            error!("Error inserting dataset rows: {}", e);
            e
        })?;

        info!("Loaded {} records from dataset into store", inserted);
        Ok(SeedOutcome::Seeded { inserted })
    }
}
