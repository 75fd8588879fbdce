//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 引导数据集读取
//!
//! 数据集为带表头的CSV，需要 `StudyHours`、`Attendance`、`Score` 三列，其余列忽略

use crate::error::{Result, ServiceError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub const STUDY_HOURS_COLUMN: &str = "StudyHours";
pub const ATTENDANCE_COLUMN: &str = "Attendance";
pub const SCORE_COLUMN: &str = "Score";

/// 数据集中的一行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetRow {
    pub study_hours: f64,
    pub attendance: f64,
    pub score: f64,
}

/// 外部数据集来源
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// 数据集描述，用于日志
    fn describe(&self) -> String;

    /// 读取全部行
    ///
    /// 任意一行格式错误即整体失败，返回 `LoadFailure`
    async fn read_rows(&self) -> Result<Vec<DatasetRow>>;
}

/// CSV文件数据集
#[derive(Debug, Clone)]
pub struct CsvDataset {
    path: PathBuf,
}

impl CsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl DatasetSource for CsvDataset {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(skip(self), level = "debug", fields(path = %self.path.display()))]
    async fn read_rows(&self) -> Result<Vec<DatasetRow>> {
        let content = tokio::fs::read(&self.path).await.map_err(|e| {
            ServiceError::LoadFailure(format!("cannot read {}: {}", self.path.display(), e))
        })?;
        let rows = parse_csv(&content)?;
        debug!("Parsed {} dataset rows", rows.len());
        Ok(rows)
    }
}

/// 解析CSV内容
///
/// 行号从 1 开始计数，不含表头
pub fn parse_csv(content: &[u8]) -> Result<Vec<DatasetRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader
        .headers()
        .map_err(|e| ServiceError::LoadFailure(format!("invalid header: {}", e)))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ServiceError::LoadFailure(format!("missing column '{}'", name)))
    };
    let study_hours_idx = column(STUDY_HOURS_COLUMN)?;
    let attendance_idx = column(ATTENDANCE_COLUMN)?;
    let score_idx = column(SCORE_COLUMN)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 1;
        let record =
            record.map_err(|e| ServiceError::LoadFailure(format!("row {}: {}", line, e)))?;

        let field = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            parse_number(raw)
                .ok_or_else(|| {
                    ServiceError::LoadFailure(format!(
                        "row {}: {} '{}' is not a number",
                        line, name, raw
                    ))
                })
        };

        let row = DatasetRow {
            study_hours: field(study_hours_idx, STUDY_HOURS_COLUMN)?,
            attendance: field(attendance_idx, ATTENDANCE_COLUMN)?,
            score: field(score_idx, SCORE_COLUMN)?,
        };

        if row.study_hours < 0.0 {
            return Err(ServiceError::LoadFailure(format!(
                "row {}: {} {} is negative",
                line, STUDY_HOURS_COLUMN, row.study_hours
            )));
        }

        rows.push(row);
    }

    Ok(rows)
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}
