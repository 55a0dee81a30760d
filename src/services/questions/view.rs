//! 轮次问题视图

use std::collections::{HashMap, HashSet};

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::{QuestionService, select_round};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    questions::{
        entities::Question,
        responses::{QuestionAuthor, QuestionView},
    },
    rounds::{requests::RoundQuery, responses::RoundView},
    users::entities::User,
};
use crate::services::grades::rating::heat_counts;
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 排序：优先级降序、热度降序、时间降序
pub fn sort_questions(views: &mut [QuestionView]) {
    views.sort_by(|a, b| {
        b.tpriority
            .cmp(&a.tpriority)
            .then(b.heat.cmp(&a.heat))
            .then(b.time.cmp(&a.time))
            .then(b.id.cmp(&a.id))
    });
}

/// 问题对当前用户是否可见
fn is_visible(question: &Question, viewer_id: i64, can_manage: bool) -> bool {
    question.approved || can_manage || question.user_id == viewer_id
}

/// 查看某一轮次的问题，缺省为当前轮次
pub async fn view_round(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    round_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<RoundView> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require_view(now)?;
    let hotquestion = &access.hotquestion;
    let capabilities = &access.capabilities;

    let rounds = storage.list_rounds(hotquestion_id).await?;
    let (index, round) = select_round(&rounds, round_id)?;
    let previous_round_id = index.checked_sub(1).map(|i| rounds[i].id);
    let next_round_id = rounds.get(index + 1).map(|r| r.id);

    let remaining_heat = match rounds.iter().find(|r| r.is_open()) {
        Some(current) => {
            let used = storage.count_round_votes_by_user(current, user.id).await?;
            hotquestion.remaining_heat(used as usize)
        }
        None => hotquestion.remaining_heat(0),
    };

    let questions: Vec<Question> = storage
        .list_round_questions(round)
        .await?
        .into_iter()
        .filter(|q| is_visible(q, user.id, capabilities.manage_entries))
        .collect();

    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let votes = storage.list_votes_for_questions(&question_ids).await?;
    let heat = heat_counts(&questions, &votes);
    let voted: HashSet<i64> = votes
        .iter()
        .filter(|v| v.voter_id == user.id)
        .map(|v| v.question_id)
        .collect();

    let author_ids: Vec<i64> = questions
        .iter()
        .filter(|q| !q.anonymous || q.user_id == user.id)
        .map(|q| q.user_id)
        .collect();
    let users: HashMap<i64, User> = storage
        .list_users_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let accepting_votes =
        capabilities.vote && round.is_open() && hotquestion.is_open_at(now);

    let mut views: Vec<QuestionView> = questions
        .into_iter()
        .map(|q| {
            let is_mine = q.user_id == user.id;
            let has_voted = voted.contains(&q.id);
            let author = if q.anonymous && !is_mine {
                None
            } else {
                users.get(&q.user_id).map(|u| QuestionAuthor {
                    id: u.id,
                    username: u.username.clone(),
                    display_name: u.display_name.clone(),
                })
            };
            let can_vote = accepting_votes
                && !is_mine
                && q.approved
                && (has_voted || remaining_heat != Some(0));

            QuestionView {
                heat: heat.get(&q.id).copied().unwrap_or(0),
                id: q.id,
                content: q.content,
                time: q.time,
                anonymous: q.anonymous,
                approved: q.approved,
                tpriority: q.tpriority,
                author,
                is_mine,
                voted: has_voted,
                can_vote,
            }
        })
        .collect();
    sort_questions(&mut views);

    Ok(RoundView {
        is_current: round.is_open(),
        round: round.clone(),
        previous_round_id,
        next_round_id,
        questions: views,
        remaining_heat,
    })
}

pub async fn get_round_view(
    service: &QuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    query: RoundQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match view_round(
        storage.as_ref(),
        &user,
        hotquestion_id,
        query.round_id,
        Utc::now(),
    )
    .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Questions retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HotQuestionError;
    use crate::models::questions::{entities::PriorityDirection, requests::CreateQuestionRequest};
    use crate::services::questions::{create::post_question, manage::adjust_priority};
    use crate::services::rounds::start::start_new_round;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};
    use crate::services::votes::toggle::toggle_vote;

    fn ask(content: &str, anonymous: bool) -> CreateQuestionRequest {
        CreateQuestionRequest {
            content: content.to_string(),
            anonymous,
        }
    }

    #[tokio::test]
    async fn test_ordering_by_priority_heat_time() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 3).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let s = &room.students;

        let old = post_question(storage.as_ref(), &s[0], hq.id, ask("old", false), 100, at(1_100))
            .await
            .expect("post");
        let new = post_question(storage.as_ref(), &s[0], hq.id, ask("new", false), 100, at(1_200))
            .await
            .expect("post");
        let hot = post_question(storage.as_ref(), &s[1], hq.id, ask("hot", false), 100, at(1_050))
            .await
            .expect("post");
        let pinned = post_question(storage.as_ref(), &s[1], hq.id, ask("pinned", false), 100, at(1_010))
            .await
            .expect("post");

        toggle_vote(storage.as_ref(), &s[2], hq.id, hot.id, at(1_300))
            .await
            .expect("vote");
        adjust_priority(
            storage.as_ref(),
            &room.teacher,
            hq.id,
            pinned.id,
            PriorityDirection::Up,
            at(1_300),
        )
        .await
        .expect("priority");

        let view = view_round(storage.as_ref(), &s[2], hq.id, None, at(1_400))
            .await
            .expect("view");
        let ids: Vec<i64> = view.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![pinned.id, hot.id, new.id, old.id]);
        assert!(view.is_current);
        assert!(view.questions[1].voted);
        assert_eq!(view.questions[1].heat, 1);
    }

    #[tokio::test]
    async fn test_hidden_and_anonymous_entries() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let mut req = activity_request("Moderated");
        req.require_approval = true;
        let hq = activity(storage.as_ref(), &room, req).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);

        post_question(storage.as_ref(), alice, hq.id, ask("pending", true), 100, at(1_100))
            .await
            .expect("post");

        let own = view_round(storage.as_ref(), alice, hq.id, None, at(1_200))
            .await
            .expect("view");
        assert_eq!(own.questions.len(), 1);
        assert!(own.questions[0].author.is_some());
        assert!(!own.questions[0].can_vote);

        let other = view_round(storage.as_ref(), bob, hq.id, None, at(1_200))
            .await
            .expect("view");
        assert!(other.questions.is_empty());

        let teacher = view_round(storage.as_ref(), &room.teacher, hq.id, None, at(1_200))
            .await
            .expect("view");
        assert_eq!(teacher.questions.len(), 1);
        assert!(teacher.questions[0].author.is_none());
    }

    #[tokio::test]
    async fn test_round_navigation() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let student = &room.students[0];

        post_question(storage.as_ref(), student, hq.id, ask("first", false), 100, at(1_100))
            .await
            .expect("post");
        let second = start_new_round(storage.as_ref(), &room.teacher, hq.id, at(1_200))
            .await
            .expect("round");

        let current = view_round(storage.as_ref(), student, hq.id, None, at(1_300))
            .await
            .expect("view");
        assert_eq!(current.round.id, second.id);
        assert!(current.questions.is_empty());
        let previous = current.previous_round_id.expect("previous round");
        assert!(current.next_round_id.is_none());

        let archived = view_round(storage.as_ref(), student, hq.id, Some(previous), at(1_300))
            .await
            .expect("view");
        assert!(!archived.is_current);
        assert_eq!(archived.next_round_id, Some(second.id));
        assert_eq!(archived.questions.len(), 1);
        assert!(!archived.questions[0].can_vote);

        let missing = view_round(storage.as_ref(), student, hq.id, Some(9_999), at(1_300)).await;
        assert!(matches!(missing, Err(HotQuestionError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_view_after_close() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Closed");
        req.time_close = 2_000;
        let hq = activity(storage.as_ref(), &room, req).await;

        let closed = view_round(storage.as_ref(), &room.students[0], hq.id, None, at(2_500)).await;
        assert!(matches!(closed, Err(HotQuestionError::ActivityClosed(_))));

        view_round(storage.as_ref(), &room.teacher, hq.id, None, at(2_500))
            .await
            .expect("managers can always view");
    }
}
