use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradingSortField {
    #[default]
    Username,
    Posts,
    HeatGiven,
    HeatReceived,
    RawRating,
    Grade,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradingTableParams {
    #[serde(default)]
    pub page: Option<i64>,
    /// 缺省时使用 `hotquestion.default_page_size`
    #[serde(default)]
    pub size: Option<i64>,
    #[serde(default)]
    pub sort: GradingSortField,
    #[serde(default)]
    pub order: SortOrder,
}

impl GradingTableParams {
    pub fn pagination(&self, default_size: i64) -> PaginationQuery {
        PaginationQuery {
            page: self.page.unwrap_or(1),
            size: self.size.unwrap_or(default_size),
        }
    }
}
