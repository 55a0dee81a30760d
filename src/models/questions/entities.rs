use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct Question {
    pub id: i64,
    pub hotquestion_id: i64,
    pub user_id: i64,
    pub content: String,
    pub time: DateTime<Utc>,
    pub anonymous: bool,
    pub approved: bool,
    // 教师手动调整的优先级
    pub tpriority: i32,
}

/// 待写入的新问题
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub hotquestion_id: i64,
    pub user_id: i64,
    pub content: String,
    pub time: DateTime<Utc>,
    pub anonymous: bool,
    pub approved: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub enum PriorityDirection {
    Up,
    Down,
}

impl PriorityDirection {
    pub fn delta(self) -> i32 {
        match self {
            PriorityDirection::Up => 1,
            PriorityDirection::Down => -1,
        }
    }
}
