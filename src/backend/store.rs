//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Sea-ORM的持久化存储适配器。

use super::RecordStore;
use crate::config::DatabaseConfig;
use crate::error::{Result, ServiceError};
use crate::model::{student, NewStudent, StudentRecord, StudentUpdate};
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr,
    EntityTrait, NotSet, PaginatorTrait, QueryOrder, Schema, Set, TransactionTrait,
};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// 单条 INSERT 语句的默认行数，避免超出 SQLite 的参数数量上限
const DEFAULT_INSERT_CHUNK: usize = 500;

/// Sea-ORM持久化存储
#[derive(Clone)]
pub struct SeaOrmStore {
    connection: DatabaseConnection,
    insert_chunk: usize,
}

impl std::fmt::Debug for SeaOrmStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeaOrmStore")
            .field("backend", &self.connection.get_database_backend())
            .field("insert_chunk", &self.insert_chunk)
            .finish()
    }
}

impl SeaOrmStore {
    /// 根据配置建立数据库连接
    #[instrument(skip(config), level = "info", name = "init_store")]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.expose_secret().to_string();

        let mut opt = ConnectOptions::new(url.clone());
        opt.max_connections(config.max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(config.sqlx_logging);

        let connection = Database::connect(opt).await.map_err(|e| {
            ServiceError::DatabaseError(format!(
                "Failed to open database {}: {}",
                redact_connection_string(&url),
                e
            ))
        })?;

        info!(
            "Connected to database {}",
            redact_connection_string(&url)
        );
        Ok(Self::from_connection(connection))
    }

    /// 使用已有连接创建存储
    pub fn from_connection(connection: DatabaseConnection) -> Self {
        Self {
            connection,
            insert_chunk: DEFAULT_INSERT_CHUNK,
        }
    }

    /// 设置批量插入时单条语句的行数
    pub fn with_insert_chunk(mut self, insert_chunk: usize) -> Self {
        self.insert_chunk = insert_chunk.max(1);
        self
    }

    /// 表不存在时创建
    #[instrument(skip(self), level = "debug")]
    pub async fn ensure_schema(&self) -> Result<()> {
        let backend = self.connection.get_database_backend();
        let schema = Schema::new(backend);
        let mut statement = schema.create_table_from_entity(student::Entity);
        statement.if_not_exists();
        self.connection.execute(backend.build(&statement)).await?;
        debug!("Student table is ready");
        Ok(())
    }

    /// 关闭连接池
    pub async fn close(self) -> Result<()> {
        self.connection.close().await?;
        Ok(())
    }
}

fn to_active_model(record: &NewStudent) -> student::ActiveModel {
    student::ActiveModel {
        id: NotSet,
        name: Set(record.name.clone()),
        study_hours: Set(record.study_hours),
        attendance: Set(record.attendance),
        score: Set(record.score),
    }
}

#[async_trait]
impl RecordStore for SeaOrmStore {
    #[instrument(skip(self), level = "debug")]
    async fn find_all(&self) -> Result<Vec<StudentRecord>> {
        let records = student::Entity::find()
            .order_by_asc(student::Column::Id)
            .all(&self.connection)
            .await?;
        debug!("Loaded {} records from store", records.len());
        Ok(records)
    }

    #[instrument(skip(self, update), level = "debug")]
    async fn find_by_id_and_update(
        &self,
        id: i32,
        update: &StudentUpdate,
    ) -> Result<Option<StudentRecord>> {
        let Some(existing) = student::Entity::find_by_id(id)
            .one(&self.connection)
            .await?
        else {
            debug!("No record with id {}", id);
            return Ok(None);
        };

        if update.is_empty() {
            return Ok(Some(existing));
        }

        let mut active: student::ActiveModel = existing.into();
        if let Some(name) = &update.name {
            active.name = Set(name.clone());
        }
        if let Some(study_hours) = update.study_hours {
            active.study_hours = Set(study_hours);
        }
        if let Some(attendance) = update.attendance {
            active.attendance = Set(attendance);
        }
        if let Some(score) = update.score {
            active.score = Set(score);
        }

        match active.update(&self.connection).await {
            Ok(updated) => Ok(Some(updated)),
            // 记录在读取与更新之间被删除
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, records), level = "debug", fields(rows = records.len()))]
    async fn insert_many(&self, records: Vec<NewStudent>) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let txn = self.connection.begin().await?;
        for chunk in records.chunks(self.insert_chunk) {
            student::Entity::insert_many(chunk.iter().map(to_active_model))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        debug!("Inserted {} records", records.len());
        Ok(records.len() as u64)
    }

    #[instrument(skip(self), level = "debug")]
    async fn count(&self) -> Result<u64> {
        let count = student::Entity::find().count(&self.connection).await?;
        Ok(count)
    }
}
