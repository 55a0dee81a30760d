use chrono::{DateTime, Utc};
use serde::Serialize;
use ts_rs::TS;

use crate::models::comments::entities::Comment;
use crate::models::grades::entities::Grade;
use crate::models::questions::entities::Question;
use crate::models::votes::entities::Vote;

/// 单个活动中的用户数据
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/privacy.ts")]
pub struct ActivityUserData {
    pub hotquestion_id: i64,
    pub hotquestion_name: String,
    pub questions: Vec<Question>,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
    pub grade: Option<Grade>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/privacy.ts")]
pub struct UserDataExport {
    pub user_id: i64,
    pub exported_at: DateTime<Utc>,
    pub activities: Vec<ActivityUserData>,
}

#[derive(Debug, Default, Serialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/privacy.ts")]
pub struct DeleteUserDataResult {
    pub questions: u64,
    pub votes: u64,
    pub comments: u64,
    pub grades: u64,
}
