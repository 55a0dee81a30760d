use serde::Deserialize;
use ts_rs::TS;

/// 删除用户数据的范围，缺省为全部活动
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/privacy.ts")]
pub struct DeleteUserDataQuery {
    pub hotquestion_id: Option<i64>,
}
