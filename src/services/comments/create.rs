use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::{CommentService, load_visible_question};
use crate::config::AppConfig;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse,
    comments::{entities::Comment, requests::CreateCommentRequest},
    users::entities::User,
};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

pub async fn add_comment(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    req: CreateCommentRequest,
    max_length: usize,
    now: DateTime<Utc>,
) -> Result<Comment> {
    let (_, question) = load_visible_question(storage, user, hotquestion_id, question_id, now).await?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(HotQuestionError::validation("评论内容不能为空"));
    }
    if content.chars().count() > max_length {
        return Err(HotQuestionError::validation(format!(
            "评论内容不能超过 {max_length} 个字符"
        )));
    }

    storage
        .create_comment(question.id, user.id, content.to_string(), now)
        .await
}

pub async fn create_comment(
    service: &CommentService,
    request: &HttpRequest,
    hotquestion_id: i64,
    question_id: i64,
    req: CreateCommentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    let max_length = AppConfig::get().hotquestion.max_comment_length;

    match add_comment(
        storage.as_ref(),
        &user,
        hotquestion_id,
        question_id,
        req,
        max_length,
        Utc::now(),
    )
    .await
    {
        Ok(comment) => Ok(HttpResponse::Created().json(ApiResponse::success(
            comment,
            "Comment added successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
