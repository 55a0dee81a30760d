use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::HotQuestionService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{ApiResponse, users::entities::User};
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 删除活动及其全部数据（轮次、问题、投票、评论、评分、成绩册、日历事件）
pub async fn delete_instance(storage: &dyn Storage, user: &User, hotquestion_id: i64) -> Result<()> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_activity, "manage_activity")?;

    if !storage.delete_hotquestion(hotquestion_id).await? {
        return Err(HotQuestionError::not_found(format!(
            "活动不存在: {hotquestion_id}"
        )));
    }

    info!("User {} deleted hotquestion {}", user.id, hotquestion_id);
    Ok(())
}

pub async fn delete_hotquestion(
    service: &HotQuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match delete_instance(storage.as_ref(), &user, hotquestion_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Hot question deleted successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{activity, activity_request, classroom, storage};

    #[tokio::test]
    async fn test_delete_removes_owned_rows() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Lecture");
        req.time_open = 2_000;
        let hq = activity(storage.as_ref(), &room, req).await;

        let denied = delete_instance(storage.as_ref(), &room.students[0], hq.id).await;
        assert!(matches!(denied, Err(HotQuestionError::Authorization(_))));

        delete_instance(storage.as_ref(), &room.teacher, hq.id)
            .await
            .expect("delete activity");

        assert!(storage.get_hotquestion_by_id(hq.id).await.expect("get").is_none());
        assert!(storage.list_rounds(hq.id).await.expect("rounds").is_empty());
        assert!(storage.list_calendar_events(hq.id).await.expect("events").is_empty());
    }
}
