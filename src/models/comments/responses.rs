use serde::Serialize;
use ts_rs::TS;

use super::entities::Comment;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/comment.ts")]
pub struct CommentView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub comment: Comment,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/comment.ts")]
pub struct CommentListResponse {
    pub items: Vec<CommentView>,
}
