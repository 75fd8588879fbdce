//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License

use super::handlers::{self, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

/// 创建包含全部端点的路由
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/students", get(handlers::list_students))
        .route("/students/{id}", put(handlers::update_student))
        .route("/predict", post(handlers::predict_score))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
