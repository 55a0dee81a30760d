use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;

/// 评分表中的一行
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradingTableRow {
    pub user_id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub posts: i64,
    pub heat_given: i64,
    pub heat_received: i64,
    pub raw_rating: f64,
    // 未设置满分时为 None
    pub grade: Option<f64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradingTableResponse {
    pub grade_max: f64,
    pub items: Vec<GradingTableRow>,
    pub pagination: PaginationInfo,
}
