use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::{PrivacyService, require_self_or_admin};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    privacy::{requests::DeleteUserDataQuery, responses::DeleteUserDataResult},
    users::entities::User,
};
use crate::services::grades::recalc::regrade_users;
use crate::services::{current_user, error_response};
use crate::storage::Storage;

/// 删除用户数据并为受影响的其他用户重新评分
pub async fn delete_user_data(
    storage: &dyn Storage,
    requester: &User,
    user_id: i64,
    hotquestion_id: Option<i64>,
    now: DateTime<Utc>,
) -> Result<DeleteUserDataResult> {
    require_self_or_admin(requester, user_id)?;

    let deletion = storage.delete_user_data(user_id, hotquestion_id).await?;

    let mut by_activity: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for (hq, affected_user) in deletion.affected {
        by_activity.entry(hq).or_default().push(affected_user);
    }
    for (hq, users) in by_activity {
        if let Some(hotquestion) = storage.get_hotquestion_by_id(hq).await? {
            regrade_users(storage, &hotquestion, &users, now).await?;
        }
    }

    warn!(
        "User {} deleted data of user {}: {:?}",
        requester.id, user_id, deletion.result
    );
    Ok(deletion.result)
}

pub async fn delete_user_data_handler(
    service: &PrivacyService,
    request: &HttpRequest,
    user_id: i64,
    query: DeleteUserDataQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let requester = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match delete_user_data(
        storage.as_ref(),
        &requester,
        user_id,
        query.hotquestion_id,
        Utc::now(),
    )
    .await
    {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            result,
            "User data deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HotQuestionError;
    use crate::models::{
        comments::requests::CreateCommentRequest, questions::requests::CreateQuestionRequest,
    };
    use crate::services::comments::create::add_comment;
    use crate::services::privacy::export::export_user_data;
    use crate::services::questions::create::post_question;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};
    use crate::services::votes::toggle::toggle_vote;

    #[tokio::test]
    async fn test_export_then_delete() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let (alice, bob) = (&room.students[0], &room.students[1]);

        let alice_q = post_question(
            storage.as_ref(),
            alice,
            hq.id,
            CreateQuestionRequest {
                content: "alice asks".to_string(),
                anonymous: false,
            },
            100,
            at(1_100),
        )
        .await
        .expect("post");
        let bob_q = post_question(
            storage.as_ref(),
            bob,
            hq.id,
            CreateQuestionRequest {
                content: "bob asks".to_string(),
                anonymous: false,
            },
            100,
            at(1_110),
        )
        .await
        .expect("post");
        toggle_vote(storage.as_ref(), bob, hq.id, alice_q.id, at(1_200))
            .await
            .expect("vote");
        toggle_vote(storage.as_ref(), alice, hq.id, bob_q.id, at(1_200))
            .await
            .expect("vote");
        add_comment(
            storage.as_ref(),
            alice,
            hq.id,
            bob_q.id,
            CreateCommentRequest {
                content: "nice".to_string(),
            },
            100,
            at(1_250),
        )
        .await
        .expect("comment");

        // bob：提问 1 + 收到热度 1 + 投票 1
        let grade = storage.get_grade(hq.id, bob.id).await.expect("grade");
        assert_eq!(grade.map(|g| g.raw_rating), Some(3.0));

        let export = export_user_data(storage.as_ref(), alice, alice.id, at(1_300))
            .await
            .expect("export");
        assert_eq!(export.activities.len(), 1);
        let data = &export.activities[0];
        assert_eq!(data.questions.len(), 1);
        assert_eq!(data.votes.len(), 1);
        assert_eq!(data.comments.len(), 1);
        assert!(data.grade.is_some());

        let denied = export_user_data(storage.as_ref(), bob, alice.id, at(1_300)).await;
        assert!(matches!(denied, Err(HotQuestionError::Authorization(_))));

        let result = delete_user_data(storage.as_ref(), alice, alice.id, None, at(1_400))
            .await
            .expect("delete");
        assert_eq!(
            result,
            DeleteUserDataResult {
                questions: 1,
                votes: 1,
                comments: 1,
                grades: 1,
            }
        );

        // bob 失去了 alice 的投票，也失去了投给 alice 问题的那一票
        let grade = storage.get_grade(hq.id, bob.id).await.expect("grade");
        assert_eq!(grade.map(|g| g.raw_rating), Some(1.0));
        assert!(storage.get_grade(hq.id, alice.id).await.expect("grade").is_none());
        assert!(
            storage
                .list_user_hotquestion_ids(alice.id)
                .await
                .expect("ids")
                .is_empty()
        );
    }
}
