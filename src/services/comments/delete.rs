use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CommentService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{ApiResponse, users::entities::User};
use crate::services::questions::load_question;
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 删除评论：作者本人或管理者
pub async fn delete_comment(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    comment_id: i64,
) -> Result<()> {
    let access = load_activity(storage, user, hotquestion_id).await?;

    let comment = storage
        .get_comment_by_id(comment_id)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("评论不存在: {comment_id}")))?;
    load_question(storage, hotquestion_id, comment.question_id)
        .await
        .map_err(|_| HotQuestionError::not_found(format!("评论不存在: {comment_id}")))?;

    access.require(
        comment.user_id == user.id || access.capabilities.manage_entries,
        "delete_comment",
    )?;

    storage.delete_comment(comment_id).await?;
    Ok(())
}

pub async fn delete_comment_handler(
    service: &CommentService,
    request: &HttpRequest,
    hotquestion_id: i64,
    comment_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match delete_comment(storage.as_ref(), &user, hotquestion_id, comment_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Comment deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comments::requests::CreateCommentRequest;
    use crate::models::questions::requests::CreateQuestionRequest;
    use crate::services::comments::{create::add_comment, list::list_comments};
    use crate::services::questions::create::post_question;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    #[tokio::test]
    async fn test_comment_lifecycle() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);

        let q = post_question(
            storage.as_ref(),
            alice,
            hq.id,
            CreateQuestionRequest {
                content: "What is a monad?".to_string(),
                anonymous: false,
            },
            100,
            at(1_100),
        )
        .await
        .expect("post");

        let comment = add_comment(
            storage.as_ref(),
            bob,
            hq.id,
            q.id,
            CreateCommentRequest {
                content: "  Good one  ".to_string(),
            },
            100,
            at(1_200),
        )
        .await
        .expect("comment");
        assert_eq!(comment.content, "Good one");

        let items = list_comments(storage.as_ref(), alice, hq.id, q.id, at(1_300))
            .await
            .expect("list");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].username, "student1");

        let denied = delete_comment(storage.as_ref(), alice, hq.id, comment.id).await;
        assert!(matches!(denied, Err(HotQuestionError::Authorization(_))));

        delete_comment(storage.as_ref(), &room.teacher, hq.id, comment.id)
            .await
            .expect("delete");
        assert!(
            storage
                .list_comments(q.id)
                .await
                .expect("list")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_hidden_question_rejects_comments() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let mut req = activity_request("Moderated");
        req.require_approval = true;
        let hq = activity(storage.as_ref(), &room, req).await;

        let q = post_question(
            storage.as_ref(),
            &room.students[0],
            hq.id,
            CreateQuestionRequest {
                content: "pending".to_string(),
                anonymous: false,
            },
            100,
            at(1_100),
        )
        .await
        .expect("post");

        let result = add_comment(
            storage.as_ref(),
            &room.students[1],
            hq.id,
            q.id,
            CreateCommentRequest {
                content: "hi".to_string(),
            },
            100,
            at(1_200),
        )
        .await;
        assert!(matches!(result, Err(HotQuestionError::NotFound(_))));
    }
}
