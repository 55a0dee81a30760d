//! 问题管理：删除、审核、优先级

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{QuestionService, load_question};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse,
    questions::entities::{PriorityDirection, Question},
    users::entities::User,
};
use crate::services::grades::recalc::regrade_users;
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 删除问题及其投票与评论
pub async fn remove_question(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    now: DateTime<Utc>,
) -> Result<()> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_entries, "manage_entries")?;
    load_question(storage, hotquestion_id, question_id).await?;

    let (question, mut affected) = storage
        .delete_question(question_id)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("问题不存在: {question_id}")))?;
    affected.push(question.user_id);

    regrade_users(storage, &access.hotquestion, &affected, now).await?;
    info!(
        "User {} removed question {} from hotquestion {}",
        user.id, question_id, hotquestion_id
    );
    Ok(())
}

/// 切换审核状态；作者与投票者的评分都会受影响
pub async fn toggle_approval(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    now: DateTime<Utc>,
) -> Result<Question> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_entries, "manage_entries")?;
    let question = load_question(storage, hotquestion_id, question_id).await?;

    let updated = storage
        .set_question_approved(question_id, !question.approved)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("问题不存在: {question_id}")))?;

    let mut affected: Vec<i64> = storage
        .list_votes_for_questions(&[question_id])
        .await?
        .into_iter()
        .map(|v| v.voter_id)
        .collect();
    affected.push(updated.user_id);
    regrade_users(storage, &access.hotquestion, &affected, now).await?;

    Ok(updated)
}

/// 教师优先级 ±1
pub async fn adjust_priority(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    direction: PriorityDirection,
    now: DateTime<Utc>,
) -> Result<Question> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.rate, "rate")?;
    load_question(storage, hotquestion_id, question_id).await?;

    let updated = storage
        .adjust_question_priority(question_id, direction.delta())
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("问题不存在: {question_id}")))?;

    regrade_users(storage, &access.hotquestion, &[updated.user_id], now).await?;
    Ok(updated)
}

pub async fn delete_question(
    service: &QuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match remove_question(storage.as_ref(), &user, hotquestion_id, question_id, Utc::now()).await
    {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Question removed successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn approve_question(
    service: &QuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match toggle_approval(storage.as_ref(), &user, hotquestion_id, question_id, Utc::now()).await
    {
        Ok(question) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            question,
            "Question approval toggled successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn prioritize_question(
    service: &QuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    question_id: i64,
    direction: PriorityDirection,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match adjust_priority(
        storage.as_ref(),
        &user,
        hotquestion_id,
        question_id,
        direction,
        Utc::now(),
    )
    .await
    {
        Ok(question) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            question,
            "Question priority updated successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::requests::CreateQuestionRequest;
    use crate::services::questions::create::post_question;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};
    use crate::services::votes::toggle::toggle_vote;

    fn ask(content: &str) -> CreateQuestionRequest {
        CreateQuestionRequest {
            content: content.to_string(),
            anonymous: false,
        }
    }

    async fn raw_rating(storage: &dyn Storage, hotquestion_id: i64, user_id: i64) -> Option<f64> {
        storage
            .get_grade(hotquestion_id, user_id)
            .await
            .expect("grade")
            .map(|g| g.raw_rating)
    }

    #[tokio::test]
    async fn test_priority_overrides_default_factor() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let student = &room.students[0];
        let q = post_question(storage.as_ref(), student, hq.id, ask("q"), 100, at(1_100))
            .await
            .expect("post");

        for _ in 0..3 {
            adjust_priority(storage.as_ref(), &room.teacher, hq.id, q.id, PriorityDirection::Up, at(1_200))
                .await
                .expect("up");
        }
        assert_eq!(raw_rating(storage.as_ref(), hq.id, student.id).await, Some(3.0));

        let q = adjust_priority(storage.as_ref(), &room.teacher, hq.id, q.id, PriorityDirection::Down, at(1_300))
            .await
            .expect("down");
        assert_eq!(q.tpriority, 2);

        let denied = adjust_priority(storage.as_ref(), student, hq.id, q.id, PriorityDirection::Up, at(1_300)).await;
        assert!(matches!(denied, Err(HotQuestionError::Authorization(_))));
    }

    #[tokio::test]
    async fn test_approval_toggle_regrades_voters() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);
        let q = post_question(storage.as_ref(), alice, hq.id, ask("q"), 100, at(1_100))
            .await
            .expect("post");
        toggle_vote(storage.as_ref(), bob, hq.id, q.id, at(1_150))
            .await
            .expect("vote");
        assert_eq!(raw_rating(storage.as_ref(), hq.id, alice.id).await, Some(2.0));

        let hidden = toggle_approval(storage.as_ref(), &room.teacher, hq.id, q.id, at(1_200))
            .await
            .expect("toggle");
        assert!(!hidden.approved);
        assert_eq!(raw_rating(storage.as_ref(), hq.id, alice.id).await, Some(0.0));
        assert_eq!(raw_rating(storage.as_ref(), hq.id, bob.id).await, Some(0.0));

        toggle_approval(storage.as_ref(), &room.teacher, hq.id, q.id, at(1_300))
            .await
            .expect("toggle");
        assert_eq!(raw_rating(storage.as_ref(), hq.id, bob.id).await, Some(1.0));
    }

    #[tokio::test]
    async fn test_remove_question_from_other_activity_is_not_found() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let first = activity(storage.as_ref(), &room, activity_request("First")).await;
        let second = activity(storage.as_ref(), &room, activity_request("Second")).await;
        let q = post_question(storage.as_ref(), &room.students[0], first.id, ask("q"), 100, at(1_100))
            .await
            .expect("post");

        let result = remove_question(storage.as_ref(), &room.teacher, second.id, q.id, at(1_200)).await;
        assert!(matches!(result, Err(HotQuestionError::NotFound(_))));

        remove_question(storage.as_ref(), &room.teacher, first.id, q.id, at(1_200))
            .await
            .expect("remove");
        assert!(storage.get_question_by_id(q.id).await.expect("get").is_none());
        assert_eq!(raw_rating(storage.as_ref(), first.id, room.students[0].id).await, Some(0.0));
    }
}
