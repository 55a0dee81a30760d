use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::{PrivacyService, require_self_or_admin};
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    privacy::responses::{ActivityUserData, UserDataExport},
    users::entities::User,
};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

/// 按活动汇总用户的问题、投票、评论与评分
pub async fn export_user_data(
    storage: &dyn Storage,
    requester: &User,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<UserDataExport> {
    require_self_or_admin(requester, user_id)?;

    let mut activities = Vec::new();
    for hotquestion_id in storage.list_user_hotquestion_ids(user_id).await? {
        let Some(hotquestion) = storage.get_hotquestion_by_id(hotquestion_id).await? else {
            continue;
        };
        activities.push(ActivityUserData {
            hotquestion_id,
            hotquestion_name: hotquestion.name,
            questions: storage.list_user_questions(user_id, hotquestion_id).await?,
            votes: storage.list_user_votes(user_id, hotquestion_id).await?,
            comments: storage.list_user_comments(user_id, hotquestion_id).await?,
            grade: storage.get_grade(hotquestion_id, user_id).await?,
        });
    }

    info!(
        "User {} exported data of user {} ({} activities)",
        requester.id,
        user_id,
        activities.len()
    );
    Ok(UserDataExport {
        user_id,
        exported_at: now,
        activities,
    })
}

pub async fn export_user_data_handler(
    service: &PrivacyService,
    request: &HttpRequest,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let requester = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match export_user_data(storage.as_ref(), &requester, user_id, Utc::now()).await {
        Ok(export) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            export,
            "User data exported successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
