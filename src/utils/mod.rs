//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块提供了通用工具函数。

pub mod redaction;

use crate::error::{Result, ServiceError};

/// 快照键的最大长度
pub const MAX_SNAPSHOT_KEY_LENGTH: usize = 256;

/// 验证快照键
///
/// 只允许字母、数字和 `-_.:/@`
pub fn validate_snapshot_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ServiceError::InvalidInput(
            "Snapshot key cannot be empty".to_string(),
        ));
    }

    if key.len() > MAX_SNAPSHOT_KEY_LENGTH {
        return Err(ServiceError::InvalidInput(format!(
            "Snapshot key exceeds maximum length of {} bytes (got {} bytes)",
            MAX_SNAPSHOT_KEY_LENGTH,
            key.len()
        )));
    }

    if let Some(c) = key
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || "-_.:/@".contains(*c)))
    {
        return Err(ServiceError::InvalidInput(format!(
            "Snapshot key contains invalid character '{}'. Valid characters are: alphanumeric and -_.:/@",
            c
        )));
    }

    Ok(())
}
