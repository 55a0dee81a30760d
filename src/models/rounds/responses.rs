use serde::Serialize;
use ts_rs::TS;

use super::entities::Round;
use crate::models::questions::responses::QuestionView;

/// 某一轮次的问题视图
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/round.ts")]
pub struct RoundView {
    pub round: Round,
    pub previous_round_id: Option<i64>,
    pub next_round_id: Option<i64>,
    pub is_current: bool,
    pub questions: Vec<QuestionView>,
    pub remaining_heat: Option<i32>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/round.ts")]
pub struct RoundListResponse {
    pub items: Vec<Round>,
}

/// 删除轮次的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/round.ts")]
pub struct RemoveRoundResponse {
    pub removed_round_id: i64,
    pub removed_questions: u64,
    // 删除的是当前轮次时新开的轮次
    pub new_round: Option<Round>,
}
