use serde::Serialize;
use ts_rs::TS;

use super::entities::{Capabilities, CompletionState, HotQuestion};
use crate::models::rounds::entities::Round;

/// 活动详情（附当前用户视角）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct HotQuestionDetail {
    pub hotquestion: HotQuestion,
    pub capabilities: Capabilities,
    pub is_open: bool,
    pub current_round: Round,
    // None 表示不限
    pub remaining_heat: Option<i32>,
    pub completion: Option<CompletionState>,
}

/// 课程活动列表项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct CourseHotQuestionItem {
    pub id: i64,
    pub name: String,
    pub is_open: bool,
    pub question_count: i64,
    pub my_post_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct HotQuestionListResponse {
    pub items: Vec<CourseHotQuestionItem>,
}
