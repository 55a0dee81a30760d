use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::QuestionService;
use crate::config::AppConfig;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    questions::{
        entities::{NewQuestion, Question},
        requests::CreateQuestionRequest,
    },
    users::entities::User,
};
use crate::services::grades::recalc::regrade_users;
use crate::services::{access::load_activity, current_user, error_response, error_response_with};
use crate::storage::Storage;

/// 发布问题
///
/// 匿名仅在活动允许时生效；需要审核的活动中，非管理者的问题默认未审核。
pub async fn post_question(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    req: CreateQuestionRequest,
    max_length: usize,
    now: DateTime<Utc>,
) -> Result<Question> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.ask, "ask")?;
    access.require_open(now)?;

    let content = req.content.trim();
    if content.is_empty() {
        return Err(HotQuestionError::validation("问题内容不能为空"));
    }
    if content.chars().count() > max_length {
        return Err(HotQuestionError::validation(format!(
            "问题内容不能超过 {max_length} 个字符"
        )));
    }

    let hotquestion = &access.hotquestion;
    let question = storage
        .create_question(NewQuestion {
            hotquestion_id,
            user_id: user.id,
            content: content.to_string(),
            time: now,
            anonymous: req.anonymous && hotquestion.anonymous_post,
            approved: !hotquestion.require_approval || access.capabilities.manage_entries,
        })
        .await?;

    regrade_users(storage, hotquestion, &[user.id], now).await?;

    info!(
        "User {} posted question {} in hotquestion {}",
        user.id, question.id, hotquestion_id
    );
    Ok(question)
}

pub async fn create_question(
    service: &QuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    req: CreateQuestionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    let max_length = AppConfig::get().hotquestion.max_question_length;

    match post_question(
        storage.as_ref(),
        &user,
        hotquestion_id,
        req,
        max_length,
        Utc::now(),
    )
    .await
    {
        Ok(question) => Ok(HttpResponse::Created().json(ApiResponse::success(
            question,
            "Question posted successfully",
        ))),
        Err(e @ HotQuestionError::Validation(_)) => {
            Ok(error_response_with(ErrorCode::QuestionInvalid, &e))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    fn ask(content: &str, anonymous: bool) -> CreateQuestionRequest {
        CreateQuestionRequest {
            content: content.to_string(),
            anonymous,
        }
    }

    #[tokio::test]
    async fn test_content_is_trimmed_and_bounded() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let student = &room.students[0];

        let question = post_question(storage.as_ref(), student, hq.id, ask("  Why?  ", false), 10, at(1_100))
            .await
            .expect("post");
        assert_eq!(question.content, "Why?");

        let blank = post_question(storage.as_ref(), student, hq.id, ask("   ", false), 10, at(1_100)).await;
        assert!(matches!(blank, Err(HotQuestionError::Validation(_))));

        let long = post_question(
            storage.as_ref(),
            student,
            hq.id,
            ask("abcdefghijk", false),
            10,
            at(1_100),
        )
        .await;
        assert!(matches!(long, Err(HotQuestionError::Validation(_))));
    }

    #[tokio::test]
    async fn test_anonymous_only_when_allowed() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Strict");
        req.anonymous_post = false;
        let strict = activity(storage.as_ref(), &room, req).await;
        let open = activity(storage.as_ref(), &room, activity_request("Open")).await;
        let student = &room.students[0];

        let q1 = post_question(storage.as_ref(), student, strict.id, ask("a", true), 100, at(1_100))
            .await
            .expect("post");
        assert!(!q1.anonymous);

        let q2 = post_question(storage.as_ref(), student, open.id, ask("b", true), 100, at(1_100))
            .await
            .expect("post");
        assert!(q2.anonymous);
    }

    #[tokio::test]
    async fn test_approval_required_for_students_only() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Moderated");
        req.require_approval = true;
        let hq = activity(storage.as_ref(), &room, req).await;

        let student_q = post_question(storage.as_ref(), &room.students[0], hq.id, ask("s", false), 100, at(1_100))
            .await
            .expect("post");
        assert!(!student_q.approved);

        let teacher_q = post_question(storage.as_ref(), &room.teacher, hq.id, ask("t", false), 100, at(1_100))
            .await
            .expect("post");
        assert!(teacher_q.approved);
    }

    #[tokio::test]
    async fn test_closed_activity_rejects_posts() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Window");
        req.time_open = 2_000;
        req.time_close = 3_000;
        let hq = activity(storage.as_ref(), &room, req).await;
        let student = &room.students[0];

        let early = post_question(storage.as_ref(), student, hq.id, ask("early", false), 100, at(1_500)).await;
        assert!(matches!(early, Err(HotQuestionError::ActivityClosed(_))));

        let late = post_question(storage.as_ref(), student, hq.id, ask("late", false), 100, at(3_000)).await;
        assert!(matches!(late, Err(HotQuestionError::ActivityClosed(_))));

        post_question(storage.as_ref(), student, hq.id, ask("ok", false), 100, at(2_500))
            .await
            .expect("post inside window");
    }
}
