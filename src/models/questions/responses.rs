use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

/// 问题作者信息，匿名问题对他人不返回
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionAuthor {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

/// 问题列表项（附当前用户视角）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct QuestionView {
    pub id: i64,
    pub content: String,
    pub time: DateTime<Utc>,
    pub anonymous: bool,
    pub approved: bool,
    pub tpriority: i32,
    pub heat: i64,
    pub author: Option<QuestionAuthor>,
    pub is_mine: bool,
    pub voted: bool,
    pub can_vote: bool,
}
