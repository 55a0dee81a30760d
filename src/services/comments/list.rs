use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::{CommentService, load_visible_question};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    comments::responses::{CommentListResponse, CommentView},
    users::entities::User,
};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

pub async fn list_comments(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<CommentView>> {
    let (_, question) = load_visible_question(storage, user, hotquestion_id, question_id, now).await?;

    let comments = storage.list_comments(question.id).await?;
    let user_ids: Vec<i64> = comments.iter().map(|c| c.user_id).collect();
    let users: HashMap<i64, User> = storage
        .list_users_by_ids(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(comments
        .into_iter()
        .map(|comment| {
            let author = users.get(&comment.user_id);
            CommentView {
                username: author.map(|u| u.username.clone()).unwrap_or_default(),
                display_name: author.and_then(|u| u.display_name.clone()),
                comment,
            }
        })
        .collect())
}

pub async fn list_comments_handler(
    service: &CommentService,
    request: &HttpRequest,
    hotquestion_id: i64,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match list_comments(storage.as_ref(), &user, hotquestion_id, question_id, Utc::now()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CommentListResponse { items },
            "Comments retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
