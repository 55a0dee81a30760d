use serde::Deserialize;
use ts_rs::TS;

use super::entities::PriorityDirection;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct CreateQuestionRequest {
    pub content: String,
    #[serde(default)]
    pub anonymous: bool,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/question.ts")]
pub struct PriorityRequest {
    pub direction: PriorityDirection,
}
