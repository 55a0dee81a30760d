use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::warn;

use super::HotQuestionService;
use crate::errors::Result;
use crate::models::{ApiResponse, rounds::entities::Round, users::entities::User};
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 清空活动中的用户数据并开启新一轮
pub async fn reset_userdata(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    now: DateTime<Utc>,
) -> Result<Round> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_activity, "manage_activity")?;

    let round = storage.reset_hotquestion(hotquestion_id, now).await?;
    warn!(
        "User {} reset all user data of hotquestion {}",
        user.id, hotquestion_id
    );
    Ok(round)
}

pub async fn reset_hotquestion(
    service: &HotQuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match reset_userdata(storage.as_ref(), &user, hotquestion_id, Utc::now()).await {
        Ok(round) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            round,
            "Hot question reset successfully",
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

    #[tokio::test]
    async fn test_reset_clears_data_and_reopens() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;

        post_question(
            storage.as_ref(),
            &room.students[0],
            hq.id,
            CreateQuestionRequest {
                content: "Before reset".to_string(),
                anonymous: false,
            },
            500,
            at(1_100),
        )
        .await
        .expect("post");
        start_new_round(storage.as_ref(), &room.teacher, hq.id, at(1_200))
            .await
            .expect("new round");

        let round = reset_userdata(storage.as_ref(), &room.teacher, hq.id, at(1_300))
            .await
            .expect("reset");
        assert!(round.is_open());
        assert_eq!(round.start_time, at(1_300));

        let rounds = storage.list_rounds(hq.id).await.expect("rounds");
        assert_eq!(rounds, vec![round]);
        assert_eq!(storage.count_questions(hq.id, None).await.expect("count"), 0);
        assert!(storage.list_grades(hq.id).await.expect("grades").is_empty());
    }
}
