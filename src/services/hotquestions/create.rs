use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::HotQuestionService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse,
    hotquestions::{entities::HotQuestion, requests::CreateHotQuestionRequest},
    users::entities::User,
};
use crate::services::{access::resolve_capabilities, calendar::sync_calendar, current_user};
use crate::services::error_response;
use crate::storage::Storage;

const MAX_NAME_LENGTH: usize = 255;

/// 校验活动配置
pub(crate) fn validate_request(req: &CreateHotQuestionRequest) -> Result<()> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(HotQuestionError::validation("活动名称不能为空"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(HotQuestionError::validation(format!(
            "活动名称不能超过 {MAX_NAME_LENGTH} 个字符"
        )));
    }
    if req.heat_limit < 0 {
        return Err(HotQuestionError::validation("热度上限不能为负数"));
    }
    if !req.grade_max.is_finite() || req.grade_max < 0.0 {
        return Err(HotQuestionError::validation("成绩满分必须为非负数"));
    }
    if req.factor_priority < 0 || req.factor_heat < 0 || req.factor_vote < 0 {
        return Err(HotQuestionError::validation("评分系数不能为负数"));
    }
    if req.completion_post < 0 || req.completion_vote < 0 {
        return Err(HotQuestionError::validation("完成条件不能为负数"));
    }
    if req.time_open > 0 && req.time_close > 0 && req.time_close <= req.time_open {
        return Err(HotQuestionError::validation("关闭时间必须晚于开放时间"));
    }
    Ok(())
}

/// 创建活动、第一轮次与日历事件
pub async fn add_instance(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    mut req: CreateHotQuestionRequest,
    now: DateTime<Utc>,
) -> Result<HotQuestion> {
    storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("课程不存在: {course_id}")))?;

    let capabilities = resolve_capabilities(storage, user, course_id).await?;
    if !capabilities.manage_activity {
        return Err(HotQuestionError::authorization("没有权限在该课程中创建活动"));
    }

    validate_request(&req)?;
    req.name = req.name.trim().to_string();

    let (hotquestion, round) = storage.create_hotquestion(course_id, req, now).await?;
    sync_calendar(storage, &hotquestion).await?;

    info!(
        "User {} created hotquestion {} in course {} (round {})",
        user.id, hotquestion.id, course_id, round.id
    );
    Ok(hotquestion)
}

pub async fn create_hotquestion(
    service: &HotQuestionService,
    request: &HttpRequest,
    course_id: i64,
    req: CreateHotQuestionRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match add_instance(storage.as_ref(), &user, course_id, req, Utc::now()).await {
        Ok(hotquestion) => Ok(HttpResponse::Created().json(ApiResponse::success(
            hotquestion,
            "Hot question created successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{activity_request, at, classroom, storage};

    #[test]
    fn test_validate_rejects_inverted_window() {
        let mut req = activity_request("Week 1");
        req.time_open = 200;
        req.time_close = 100;
        assert!(validate_request(&req).is_err());

        req.time_close = 0;
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let req = activity_request("   ");
        assert!(matches!(
            validate_request(&req),
            Err(HotQuestionError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_add_instance_opens_first_round() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;

        let hq = add_instance(
            storage.as_ref(),
            &room.teacher,
            room.course.id,
            activity_request("  Lecture  "),
            at(1_000),
        )
        .await
        .expect("create activity");
        assert_eq!(hq.name, "Lecture");

        let rounds = storage.list_rounds(hq.id).await.expect("list rounds");
        assert_eq!(rounds.len(), 1);
        assert!(rounds[0].is_open());
        assert_eq!(rounds[0].start_time, at(1_000));
    }

    #[tokio::test]
    async fn test_students_cannot_add_instance() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;

        let result = add_instance(
            storage.as_ref(),
            &room.students[0],
            room.course.id,
            activity_request("Lecture"),
            at(1_000),
        )
        .await;
        assert!(matches!(result, Err(HotQuestionError::Authorization(_))));
    }
}
