use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::HotQuestionService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    hotquestions::{entities::{CompletionState, HotQuestion}, responses::HotQuestionDetail},
    users::entities::User,
};
use crate::services::rounds::current_round;
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 用户的完成状态，未启用完成条件时为 `None`
pub async fn completion_state(
    storage: &dyn Storage,
    hotquestion: &HotQuestion,
    user_id: i64,
) -> Result<Option<CompletionState>> {
    if hotquestion.completion_post <= 0 && hotquestion.completion_vote <= 0 {
        return Ok(None);
    }

    let posts = storage.count_questions(hotquestion.id, Some(user_id)).await?;
    let votes = storage.list_user_votes(user_id, hotquestion.id).await?.len() as i64;
    Ok(hotquestion.completion_state(posts, votes))
}

/// 活动详情：配置、当前用户权限、开放状态与本轮剩余热度
pub async fn get_instance(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    now: DateTime<Utc>,
) -> Result<HotQuestionDetail> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.view, "view")?;

    let hotquestion = access.hotquestion;
    let round = current_round(storage, hotquestion.id).await?;
    let used = storage.count_round_votes_by_user(&round, user.id).await?;
    let completion = completion_state(storage, &hotquestion, user.id).await?;

    Ok(HotQuestionDetail {
        is_open: hotquestion.is_open_at(now),
        remaining_heat: hotquestion.remaining_heat(used as usize),
        capabilities: access.capabilities,
        current_round: round,
        completion,
        hotquestion,
    })
}

pub async fn get_hotquestion(
    service: &HotQuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match get_instance(storage.as_ref(), &user, hotquestion_id, Utc::now()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Hot question retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn get_completion(
    service: &HotQuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    let result = async {
        let access = load_activity(storage.as_ref(), &user, hotquestion_id).await?;
        access.require(access.capabilities.view, "view")?;
        completion_state(storage.as_ref(), &access.hotquestion, user.id).await
    }
    .await;

    match result {
        Ok(completion) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            completion,
            "Completion state retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HotQuestionError;
    use crate::models::questions::requests::CreateQuestionRequest;
    use crate::services::questions::create::post_question;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage, user};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_get_instance_reports_viewer_state() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Lecture");
        req.heat_limit = 2;
        req.completion_post = 1;
        let hq = activity(storage.as_ref(), &room, req).await;
        let student = &room.students[0];

        let detail = get_instance(storage.as_ref(), student, hq.id, at(1_100))
            .await
            .expect("detail");
        assert!(detail.is_open);
        assert!(detail.capabilities.ask);
        assert!(!detail.capabilities.manage_entries);
        assert_eq!(detail.remaining_heat, Some(2));
        assert_eq!(detail.completion.map(|c| c.complete), Some(false));

        post_question(
            storage.as_ref(),
            student,
            hq.id,
            CreateQuestionRequest {
                content: "What is entropy?".to_string(),
                anonymous: false,
            },
            500,
            at(1_200),
        )
        .await
        .expect("post");

        let completion = completion_state(storage.as_ref(), &hq, student.id)
            .await
            .expect("completion");
        assert_eq!(completion.map(|c| c.complete), Some(true));
    }

    #[tokio::test]
    async fn test_outsider_cannot_view() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 0).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let outsider = user(storage.as_ref(), "outsider", UserRole::User).await;

        let result = get_instance(storage.as_ref(), &outsider, hq.id, at(1_100)).await;
        assert!(matches!(result, Err(HotQuestionError::Authorization(_))));
    }
}
