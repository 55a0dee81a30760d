use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分系数（百分比）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct RatingFactors {
    pub priority: i32,
    pub heat: i32,
    pub vote: i32,
}

impl Default for RatingFactors {
    fn default() -> Self {
        Self {
            priority: 100,
            heat: 100,
            vote: 100,
        }
    }
}

/// 缓存的原始评分
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub hotquestion_id: i64,
    pub user_id: i64,
    pub raw_rating: f64,
    pub updated_at: DateTime<Utc>,
}

/// 推送到成绩册的成绩
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradebookEntry {
    pub id: i64,
    pub hotquestion_id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub grade: f64,
    pub grade_max: f64,
    pub updated_at: DateTime<Utc>,
}
