//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了学生成绩记录的数据模型。

pub mod student;

use serde::{de, Deserialize, Deserializer, Serialize};

/// 学生成绩记录（存储实体即对外模型）
pub type StudentRecord = student::Model;

/// 部分字段更新
///
/// 缺省字段保持不变；数值字段同时接受数字和数字字符串
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentUpdate {
    #[serde(rename = "Student_Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        rename = "Study_hours",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub study_hours: Option<f64>,
    #[serde(
        rename = "Attendance",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub attendance: Option<f64>,
    #[serde(
        rename = "Score",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<f64>,
}

impl StudentUpdate {
    /// 是否没有任何待更新字段
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.study_hours.is_none()
            && self.attendance.is_none()
            && self.score.is_none()
    }

    /// 将更新应用到一条记录上
    pub fn apply_to(&self, record: &mut StudentRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(study_hours) = self.study_hours {
            record.study_hours = study_hours;
        }
        if let Some(attendance) = self.attendance {
            record.attendance = attendance;
        }
        if let Some(score) = self.score {
            record.score = score;
        }
    }
}

/// 数字或数字字符串，`null` 视为缺省
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric {
        Number(f64),
        Text(String),
    }

    match Option::<Numeric>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Numeric::Number(value)) => Ok(Some(value)),
        Some(Numeric::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("'{}' is not a number", text))),
    }
}

/// 待插入的新记录，标识由存储分配
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub study_hours: f64,
    pub attendance: f64,
    pub score: f64,
}

impl NewStudent {
    /// 以给定标识生成完整记录
    pub fn into_record(self, id: i32) -> StudentRecord {
        StudentRecord {
            id,
            name: self.name,
            study_hours: self.study_hours,
            attendance: self.attendance,
            score: self.score,
        }
    }
}
