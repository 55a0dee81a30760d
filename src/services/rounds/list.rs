use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::RoundService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    rounds::{entities::Round, responses::RoundListResponse},
    users::entities::User,
};
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 按开始时间排列的全部轮次
pub async fn list_rounds(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
) -> Result<Vec<Round>> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.view, "view")?;
    storage.list_rounds(hotquestion_id).await
}

pub async fn list_rounds_handler(
    service: &RoundService,
    request: &HttpRequest,
    hotquestion_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match list_rounds(storage.as_ref(), &user, hotquestion_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RoundListResponse { items },
            "Rounds retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
