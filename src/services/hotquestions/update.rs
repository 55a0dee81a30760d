use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::HotQuestionService;
use super::create::validate_request;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse,
    hotquestions::{
        entities::HotQuestion,
        requests::{CreateHotQuestionRequest, UpdateHotQuestionRequest},
    },
    users::entities::User,
};
use crate::services::grades::recalc::regrade_all;
use crate::services::{access::load_activity, calendar::sync_calendar, current_user, error_response};
use crate::storage::Storage;

/// 将更新合并到现有配置上，便于整体校验
fn merged(existing: &HotQuestion, update: &UpdateHotQuestionRequest) -> CreateHotQuestionRequest {
    let ts = |t: Option<DateTime<Utc>>| t.map(|t| t.timestamp()).unwrap_or(0);
    CreateHotQuestionRequest {
        name: update.name.clone().unwrap_or_else(|| existing.name.clone()),
        intro: None,
        anonymous_post: update.anonymous_post.unwrap_or(existing.anonymous_post),
        require_approval: update.require_approval.unwrap_or(existing.require_approval),
        heat_limit: update.heat_limit.unwrap_or(existing.heat_limit),
        time_open: update.time_open.unwrap_or_else(|| ts(existing.time_open)),
        time_close: update.time_close.unwrap_or_else(|| ts(existing.time_close)),
        view_after_close: update.view_after_close.unwrap_or(existing.view_after_close),
        question_label: None,
        priority_label: None,
        heat_label: None,
        remove_label: None,
        approval_label: None,
        grade_max: update.grade_max.unwrap_or(existing.grade_max),
        factor_priority: update.factor_priority.unwrap_or(existing.factor_priority),
        factor_heat: update.factor_heat.unwrap_or(existing.factor_heat),
        factor_vote: update.factor_vote.unwrap_or(existing.factor_vote),
        completion_post: update.completion_post.unwrap_or(existing.completion_post),
        completion_vote: update.completion_vote.unwrap_or(existing.completion_vote),
    }
}

/// 更新活动配置，同步日历并重新评分
pub async fn update_instance(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    mut update: UpdateHotQuestionRequest,
    now: DateTime<Utc>,
) -> Result<HotQuestion> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_activity, "manage_activity")?;

    validate_request(&merged(&access.hotquestion, &update))?;
    update.name = update.name.map(|n| n.trim().to_string());

    let hotquestion = storage
        .update_hotquestion(hotquestion_id, update, now)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("活动不存在: {hotquestion_id}")))?;

    sync_calendar(storage, &hotquestion).await?;
    regrade_all(storage, &hotquestion, now).await?;

    info!("User {} updated hotquestion {}", user.id, hotquestion.id);
    Ok(hotquestion)
}

pub async fn update_hotquestion(
    service: &HotQuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    update: UpdateHotQuestionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match update_instance(storage.as_ref(), &user, hotquestion_id, update, Utc::now()).await {
        Ok(hotquestion) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            hotquestion,
            "Hot question updated successfully",
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

    #[tokio::test]
    async fn test_update_regrades_with_new_factors() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;
        let student = &room.students[0];

        post_question(
            storage.as_ref(),
            student,
            hq.id,
            CreateQuestionRequest {
                content: "Why is the sky blue?".to_string(),
                anonymous: false,
            },
            500,
            at(1_100),
        )
        .await
        .expect("post question");

        let grade = storage.get_grade(hq.id, student.id).await.expect("grade");
        assert_eq!(grade.map(|g| g.raw_rating), Some(1.0));

        let update = UpdateHotQuestionRequest {
            factor_priority: Some(300),
            ..Default::default()
        };
        update_instance(storage.as_ref(), &room.teacher, hq.id, update, at(1_200))
            .await
            .expect("update activity");

        let grade = storage.get_grade(hq.id, student.id).await.expect("grade");
        assert_eq!(grade.map(|g| g.raw_rating), Some(3.0));
    }

    #[tokio::test]
    async fn test_update_rejects_negative_heat_limit() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 0).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;

        let update = UpdateHotQuestionRequest {
            heat_limit: Some(-1),
            ..Default::default()
        };
        let result = update_instance(storage.as_ref(), &room.teacher, hq.id, update, at(1_200)).await;
        assert!(matches!(result, Err(HotQuestionError::Validation(_))));
    }
}
