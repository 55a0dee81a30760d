pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::errors::{HotQuestionError, Result};
use crate::models::{
    comments::requests::CreateCommentRequest, questions::entities::Question, users::entities::User,
};
use crate::services::access::{ActivityAccess, load_activity};
use crate::services::questions::load_question;
use crate::storage::Storage;

/// 加载问题并确认当前用户可见
pub(crate) async fn load_visible_question(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    now: DateTime<Utc>,
) -> Result<(ActivityAccess, Question)> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require_view(now)?;

    let question = load_question(storage, hotquestion_id, question_id).await?;
    if !question.approved && !access.capabilities.manage_entries && question.user_id != user.id {
        return Err(HotQuestionError::not_found(format!(
            "问题不存在: {question_id}"
        )));
    }
    Ok((access, question))
}

pub struct CommentService {
    storage: Option<Arc<dyn Storage>>,
}

impl CommentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_comments(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_comments_handler(self, request, hotquestion_id, question_id).await
    }

    pub async fn create_comment(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
        req: CreateCommentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_comment(self, request, hotquestion_id, question_id, req).await
    }

    pub async fn delete_comment(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        comment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_comment_handler(self, request, hotquestion_id, comment_id).await
    }
}
