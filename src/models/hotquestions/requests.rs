use serde::Deserialize;
use ts_rs::TS;

/// 创建活动请求
///
/// 时间字段为 Unix 秒，`0` 或缺省表示不限制。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct CreateHotQuestionRequest {
    pub name: String,
    pub intro: Option<String>,
    #[serde(default)]
    pub anonymous_post: bool,
    #[serde(default)]
    pub require_approval: bool,
    #[serde(default)]
    pub heat_limit: i32,
    #[serde(default)]
    pub time_open: i64,
    #[serde(default)]
    pub time_close: i64,
    #[serde(default)]
    pub view_after_close: bool,
    pub question_label: Option<String>,
    pub priority_label: Option<String>,
    pub heat_label: Option<String>,
    pub remove_label: Option<String>,
    pub approval_label: Option<String>,
    #[serde(default)]
    pub grade_max: f64,
    #[serde(default = "default_factor")]
    pub factor_priority: i32,
    #[serde(default = "default_factor")]
    pub factor_heat: i32,
    #[serde(default = "default_factor")]
    pub factor_vote: i32,
    #[serde(default)]
    pub completion_post: i32,
    #[serde(default)]
    pub completion_vote: i32,
}

/// 更新活动请求，缺省字段保持不变
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct UpdateHotQuestionRequest {
    pub name: Option<String>,
    pub intro: Option<String>,
    pub anonymous_post: Option<bool>,
    pub require_approval: Option<bool>,
    pub heat_limit: Option<i32>,
    pub time_open: Option<i64>,
    pub time_close: Option<i64>,
    pub view_after_close: Option<bool>,
    pub question_label: Option<String>,
    pub priority_label: Option<String>,
    pub heat_label: Option<String>,
    pub remove_label: Option<String>,
    pub approval_label: Option<String>,
    pub grade_max: Option<f64>,
    pub factor_priority: Option<i32>,
    pub factor_heat: Option<i32>,
    pub factor_vote: Option<i32>,
    pub completion_post: Option<i32>,
    pub completion_vote: Option<i32>,
}

fn default_factor() -> i32 {
    100
}
