//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块包含缓存与存储之间的同步逻辑，以及一次性引导导入。

pub mod bootstrap;
pub mod dataset;
pub mod synchronizer;

pub use bootstrap::{BootstrapLoader, SeedOutcome, PLACEHOLDER_NAME};
pub use dataset::{CsvDataset, DatasetRow, DatasetSource};
pub use synchronizer::{RecordSynchronizer, SyncStats, DEFAULT_SNAPSHOT_KEY};
