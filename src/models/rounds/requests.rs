use serde::Deserialize;
use ts_rs::TS;

/// 查看/导出时指定轮次，缺省为当前轮次
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/round.ts")]
pub struct RoundQuery {
    pub round_id: Option<i64>,
}
