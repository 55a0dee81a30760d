//! 投票（热度）切换

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::debug;

use super::VoteService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{ApiResponse, ErrorCode, users::entities::User, votes::responses::VoteResponse};
use crate::services::grades::recalc::regrade_users;
use crate::services::questions::load_question;
use crate::services::rounds::current_round;
use crate::services::{access::load_activity, current_user, error_response, error_response_with};
use crate::storage::Storage;

/// 切换投票：已投则撤销，未投则投出
///
/// 撤销只要求投票权限且问题属于当前轮次；投出还要求活动开放、
/// 问题已审核且不是自己的，并且本轮热度未用完。
pub async fn toggle_vote(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    question_id: i64,
    now: DateTime<Utc>,
) -> Result<VoteResponse> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.vote, "vote")?;
    let hotquestion = &access.hotquestion;

    let question = load_question(storage, hotquestion_id, question_id).await?;
    let round = current_round(storage, hotquestion_id).await?;
    if !round.contains(question.time) {
        return Err(HotQuestionError::conflict("只能给当前轮次的问题投票"));
    }

    let votes = storage.list_votes_for_questions(&[question.id]).await?;
    let already_voted = votes.iter().any(|v| v.voter_id == user.id);

    if !already_voted {
        access.require_open(now)?;
        if question.user_id == user.id {
            return Err(HotQuestionError::validation("不能给自己的问题投票"));
        }
        if !question.approved {
            return Err(HotQuestionError::validation("问题尚未审核"));
        }
        let used = storage.count_round_votes_by_user(&round, user.id).await?;
        if hotquestion.remaining_heat(used as usize) == Some(0) {
            return Err(HotQuestionError::heat_exhausted("本轮热度已用完"));
        }
    }

    let voted = storage.toggle_vote(question.id, user.id).await?;
    regrade_users(storage, hotquestion, &[question.user_id, user.id], now).await?;

    let heat = storage
        .list_votes_for_questions(&[question.id])
        .await?
        .iter()
        .filter(|v| v.voter_id != question.user_id)
        .count() as i64;
    let used = storage.count_round_votes_by_user(&round, user.id).await?;

    debug!(
        "User {} {} question {}",
        user.id,
        if voted { "voted" } else { "unvoted" },
        question.id
    );
    Ok(VoteResponse {
        question_id: question.id,
        voted,
        heat,
        remaining_heat: hotquestion.remaining_heat(used as usize),
    })
}

pub async fn toggle_vote_handler(
    service: &VoteService,
    request: &HttpRequest,
    hotquestion_id: i64,
    question_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match toggle_vote(storage.as_ref(), &user, hotquestion_id, question_id, Utc::now()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "Vote toggled successfully",
        ))),
        Err(e @ (HotQuestionError::Validation(_) | HotQuestionError::Conflict(_))) => {
            Ok(error_response_with(ErrorCode::VoteNotAllowed, &e))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::{entities::Question, requests::CreateQuestionRequest};
    use crate::services::questions::create::post_question;
    use crate::services::rounds::start::start_new_round;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    async fn ask(storage: &dyn Storage, user: &User, hotquestion_id: i64, ts: i64) -> Question {
        post_question(
            storage,
            user,
            hotquestion_id,
            CreateQuestionRequest {
                content: format!("question at {ts}"),
                anonymous: false,
            },
            100,
            at(ts),
        )
        .await
        .expect("post")
    }

    #[tokio::test]
    async fn test_toggle_twice_leaves_no_vote() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);
        let q = ask(storage.as_ref(), alice, hq.id, 1_100).await;

        let first = toggle_vote(storage.as_ref(), bob, hq.id, q.id, at(1_200))
            .await
            .expect("vote");
        assert!(first.voted);
        assert_eq!(first.heat, 1);

        let second = toggle_vote(storage.as_ref(), bob, hq.id, q.id, at(1_300))
            .await
            .expect("unvote");
        assert!(!second.voted);
        assert_eq!(second.heat, 0);
        assert!(
            storage
                .list_votes_for_questions(&[q.id])
                .await
                .expect("votes")
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_no_self_vote() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let alice = &room.students[0];
        let q = ask(storage.as_ref(), alice, hq.id, 1_100).await;

        let result = toggle_vote(storage.as_ref(), alice, hq.id, q.id, at(1_200)).await;
        assert!(matches!(result, Err(HotQuestionError::Validation(_))));
    }

    #[tokio::test]
    async fn test_heat_limit_per_round() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let mut req = activity_request("Limited");
        req.heat_limit = 1;
        let hq = activity(storage.as_ref(), &room, req).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);
        let q1 = ask(storage.as_ref(), alice, hq.id, 1_100).await;
        let q2 = ask(storage.as_ref(), alice, hq.id, 1_110).await;

        let vote = toggle_vote(storage.as_ref(), bob, hq.id, q1.id, at(1_200))
            .await
            .expect("vote");
        assert_eq!(vote.remaining_heat, Some(0));

        let exhausted = toggle_vote(storage.as_ref(), bob, hq.id, q2.id, at(1_200)).await;
        assert!(matches!(exhausted, Err(HotQuestionError::HeatExhausted(_))));

        // 撤销后热度返还
        let unvote = toggle_vote(storage.as_ref(), bob, hq.id, q1.id, at(1_250))
            .await
            .expect("unvote");
        assert_eq!(unvote.remaining_heat, Some(1));

        start_new_round(storage.as_ref(), &room.teacher, hq.id, at(1_300))
            .await
            .expect("round");
        let q3 = ask(storage.as_ref(), alice, hq.id, 1_400).await;
        toggle_vote(storage.as_ref(), bob, hq.id, q3.id, at(1_500))
            .await
            .expect("vote in new round");

        let archived = toggle_vote(storage.as_ref(), bob, hq.id, q2.id, at(1_500)).await;
        assert!(matches!(archived, Err(HotQuestionError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unvote_allowed_after_close() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let mut req = activity_request("Timed");
        req.time_close = 2_000;
        let hq = activity(storage.as_ref(), &room, req).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);
        let q = ask(storage.as_ref(), alice, hq.id, 1_100).await;

        toggle_vote(storage.as_ref(), bob, hq.id, q.id, at(1_500))
            .await
            .expect("vote while open");

        let unvote = toggle_vote(storage.as_ref(), bob, hq.id, q.id, at(2_500))
            .await
            .expect("unvote after close");
        assert!(!unvote.voted);
        assert_eq!(unvote.heat, 0);

        let revote = toggle_vote(storage.as_ref(), bob, hq.id, q.id, at(2_600)).await;
        assert!(matches!(revote, Err(HotQuestionError::ActivityClosed(_))));
    }

    #[tokio::test]
    async fn test_unapproved_question_rejects_votes() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let mut req = activity_request("Moderated");
        req.require_approval = true;
        let hq = activity(storage.as_ref(), &room, req).await;
        let q = ask(storage.as_ref(), &room.students[0], hq.id, 1_100).await;

        let result = toggle_vote(storage.as_ref(), &room.students[1], hq.id, q.id, at(1_200)).await;
        assert!(matches!(result, Err(HotQuestionError::Validation(_))));
    }
}
