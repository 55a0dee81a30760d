use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::RoundService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{ApiResponse, rounds::responses::RemoveRoundResponse, users::entities::User};
use crate::services::grades::recalc::regrade_users;
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 删除轮次及其问题；删除的是当前轮次时立即开启新一轮
pub async fn remove_round(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    round_id: i64,
    now: DateTime<Utc>,
) -> Result<RemoveRoundResponse> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_entries, "manage_entries")?;

    let round = storage
        .get_round_by_id(round_id)
        .await?
        .filter(|r| r.hotquestion_id == hotquestion_id)
        .ok_or_else(|| HotQuestionError::not_found(format!("轮次不存在: {round_id}")))?;

    let removal = storage
        .remove_round(round.id, now)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("轮次不存在: {round_id}")))?;

    regrade_users(storage, &access.hotquestion, &removal.affected_users, now).await?;

    info!(
        "User {} removed round {} of hotquestion {} ({} questions)",
        user.id, round_id, hotquestion_id, removal.removed_questions
    );
    Ok(RemoveRoundResponse {
        removed_round_id: removal.round.id,
        removed_questions: removal.removed_questions,
        new_round: removal.new_round,
    })
}

pub async fn remove_round_handler(
    service: &RoundService,
    request: &HttpRequest,
    hotquestion_id: i64,
    round_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match remove_round(storage.as_ref(), &user, hotquestion_id, round_id, Utc::now()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Round removed successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::requests::CreateQuestionRequest;
    use crate::services::questions::create::post_question;
    use crate::services::rounds::start::start_new_round;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};
    use crate::services::votes::toggle::toggle_vote;

    fn ask(content: &str) -> CreateQuestionRequest {
        CreateQuestionRequest {
            content: content.to_string(),
            anonymous: false,
        }
    }

    #[tokio::test]
    async fn test_remove_open_round_reopens() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);

        let question = post_question(storage.as_ref(), alice, hq.id, ask("Q1"), 500, at(1_100))
            .await
            .expect("post");
        toggle_vote(storage.as_ref(), bob, hq.id, question.id, at(1_150))
            .await
            .expect("vote");
        let bob_grade = storage.get_grade(hq.id, bob.id).await.expect("grade");
        assert_eq!(bob_grade.map(|g| g.raw_rating), Some(1.0));

        let open = crate::services::rounds::current_round(storage.as_ref(), hq.id)
            .await
            .expect("current");
        let result = remove_round(storage.as_ref(), &room.teacher, hq.id, open.id, at(1_200))
            .await
            .expect("remove");
        assert_eq!(result.removed_questions, 1);
        let new_round = result.new_round.expect("new round");
        assert!(new_round.is_open());
        assert_eq!(new_round.start_time, at(1_200));

        let rounds = storage.list_rounds(hq.id).await.expect("rounds");
        assert_eq!(rounds.len(), 1);
        assert_eq!(storage.count_questions(hq.id, None).await.expect("count"), 0);

        let alice_grade = storage.get_grade(hq.id, alice.id).await.expect("grade");
        assert_eq!(alice_grade.map(|g| g.raw_rating), Some(0.0));
        let bob_grade = storage.get_grade(hq.id, bob.id).await.expect("grade");
        assert_eq!(bob_grade.map(|g| g.raw_rating), Some(0.0));
    }

    #[tokio::test]
    async fn test_remove_closed_round_keeps_current() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let alice = &room.students[0];

        post_question(storage.as_ref(), alice, hq.id, ask("old"), 500, at(1_100))
            .await
            .expect("post");
        let first = crate::services::rounds::current_round(storage.as_ref(), hq.id)
            .await
            .expect("current");
        let second = start_new_round(storage.as_ref(), &room.teacher, hq.id, at(1_200))
            .await
            .expect("new round");
        post_question(storage.as_ref(), alice, hq.id, ask("new"), 500, at(1_300))
            .await
            .expect("post");

        let result = remove_round(storage.as_ref(), &room.teacher, hq.id, first.id, at(1_400))
            .await
            .expect("remove");
        assert!(result.new_round.is_none());
        assert_eq!(result.removed_questions, 1);

        let rounds = storage.list_rounds(hq.id).await.expect("rounds");
        assert_eq!(rounds, vec![second]);
        assert_eq!(storage.count_questions(hq.id, None).await.expect("count"), 1);
    }

    #[tokio::test]
    async fn test_round_must_belong_to_activity() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 0).await;
        let first = activity(storage.as_ref(), &room, activity_request("First")).await;
        let second = activity(storage.as_ref(), &room, activity_request("Second")).await;
        let foreign = crate::services::rounds::current_round(storage.as_ref(), second.id)
            .await
            .expect("current");

        let result =
            remove_round(storage.as_ref(), &room.teacher, first.id, foreign.id, at(1_200)).await;
        assert!(matches!(result, Err(HotQuestionError::NotFound(_))));
    }
}
