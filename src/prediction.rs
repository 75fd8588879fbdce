//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了成绩预测代理，将请求转发给外部模型服务。

use crate::config::PredictionConfig;
use crate::error::{Result, ServiceError};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument};

/// 预测输入
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionInput {
    #[serde(rename = "StudyHours")]
    pub study_hours: f64,
    #[serde(rename = "Attendance")]
    pub attendance: f64,
}

impl PredictionInput {
    /// 从请求体解析预测输入
    ///
    /// 字段可以是数字或数字字符串；缺少任一字段时返回 `InvalidInput`
    pub fn from_json(body: &Value) -> Result<Self> {
        let study_hours = numeric_field(body, "StudyHours")?;
        let attendance = numeric_field(body, "Attendance")?;

        match (study_hours, attendance) {
            (Some(study_hours), Some(attendance)) => Ok(Self {
                study_hours,
                attendance,
            }),
            _ => Err(ServiceError::InvalidInput(
                "Missing StudyHours or Attendance".to_string(),
            )),
        }
    }
}

fn numeric_field(body: &Value, name: &str) -> Result<Option<f64>> {
    let invalid = || ServiceError::InvalidInput(format!("{} must be a number", name));
    match body.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

/// 成绩预测代理
#[derive(Debug, Clone)]
pub struct PredictionProxy {
    client: Client,
    endpoint: String,
}

impl PredictionProxy {
    /// 根据配置创建预测代理
    pub fn new(config: &PredictionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ServiceError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// 转发预测请求并原样返回响应体
    #[instrument(skip(self), level = "info")]
    pub async fn predict(&self, input: PredictionInput) -> Result<Value> {
        info!(
            "Sending to prediction service: StudyHours={}, Attendance={}",
            input.study_hours, input.attendance
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&input)
            .send()
            .await
            .map_err(|e| ServiceError::PredictionError(e.to_string()))?
            .error_for_status()
            .map_err(|e| ServiceError::PredictionError(e.to_string()))?;

        response
            .json::<Value>()
            .await
            .map_err(|e| ServiceError::PredictionError(format!("Invalid response body: {}", e)))
    }
}
