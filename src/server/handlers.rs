//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! HTTP 请求处理函数

use crate::error::ServiceError;
use crate::model::{StudentRecord, StudentUpdate};
use crate::prediction::{PredictionInput, PredictionProxy};
use crate::sync::RecordSynchronizer;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub synchronizer: Arc<RecordSynchronizer>,
    pub predictor: Arc<PredictionProxy>,
}

/// 对外错误响应
///
/// 服务端错误细节只写入日志，响应体只包含通用提示
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn fetch(err: ServiceError) -> Self {
        error!("Error fetching student records: {}", err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Failed to fetch student records".to_string(),
        }
    }

    fn update(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => Self::not_found(),
            other => {
                error!("Error updating student record: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to update student record".to_string(),
                }
            }
        }
    }

    fn predict(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            other => {
                error!("Error predicting score: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to predict score".to_string(),
                }
            }
        }
    }

    fn rejected(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        Self {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }

    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: "Student not found".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// 健康检查
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "stats": state.synchronizer.stats(),
    }))
}

/// GET /students
pub async fn list_students(
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentRecord>>, ApiError> {
    state
        .synchronizer
        .get_all()
        .await
        .map(Json)
        .map_err(ApiError::fetch)
}

/// PUT /students/{id}
///
/// 无法解析为整数的标识不可能存在，按记录不存在处理
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    update: Result<Json<StudentUpdate>, JsonRejection>,
) -> Result<Json<StudentRecord>, ApiError> {
    let id: i32 = id.parse().map_err(|_| ApiError::not_found())?;
    let Json(update) = update.map_err(ApiError::rejected)?;
    state
        .synchronizer
        .update_one(id, update)
        .await
        .map(Json)
        .map_err(ApiError::update)
}

/// POST /predict
pub async fn predict_score(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(ApiError::rejected)?;
    let input = PredictionInput::from_json(&body).map_err(ApiError::predict)?;
    state
        .predictor
        .predict(input)
        .await
        .map(Json)
        .map_err(ApiError::predict)
}
