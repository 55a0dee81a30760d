use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/vote.ts")]
pub struct VoteResponse {
    pub question_id: i64,
    // 切换后当前用户是否已投票
    pub voted: bool,
    pub heat: i64,
    pub remaining_heat: Option<i32>,
}
