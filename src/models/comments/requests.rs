use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/comment.ts")]
pub struct CreateCommentRequest {
    pub content: String,
}
