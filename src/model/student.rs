//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 学生成绩记录实体

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 学生成绩记录
///
/// JSON 字段名沿用对外接口的命名，缓存快照与 HTTP 响应共用同一形态
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// 由存储在创建时分配
    #[sea_orm(primary_key)]
    pub id: i32,
    #[serde(rename = "Student_Name")]
    pub name: String,
    #[serde(rename = "Study_hours")]
    pub study_hours: f64,
    #[serde(rename = "Attendance")]
    pub attendance: f64,
    #[serde(rename = "Score")]
    pub score: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
