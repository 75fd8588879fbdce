//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了服务的日志与链路追踪初始化。

use opentelemetry::global;
use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::TracerProvider as SdkTracerProvider;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// 初始化日志与 OpenTelemetry Tracing
///
/// 应在进程启动时调用一次。`RUST_LOG` 存在时覆盖 `default_level`。
/// 未配置导出器时 tracer provider 不导出任何 span，只保留上下文传播。
///
/// # 参数
///
/// * `service_name` - 服务名称
/// * `default_level` - 默认日志过滤规则，例如 "info" 或 "scorecache=debug"
pub fn init_tracing(service_name: &str, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let provider = SdkTracerProvider::builder().build();
    global::set_tracer_provider(provider.clone());
    let tracer = provider.tracer(service_name.to_string());

    let subscriber = Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(tracing_opentelemetry::layer().with_tracer(tracer));

    // 测试或嵌入场景下可能已经设置过全局 subscriber
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 关闭全局 tracer provider
pub fn shutdown_tracing() {
    global::shutdown_tracer_provider();
}
