use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 热度（对问题的投票）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct Vote {
    pub id: i64,
    pub question_id: i64,
    pub voter_id: i64,
}
