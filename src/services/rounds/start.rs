use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::RoundService;
use crate::errors::Result;
use crate::models::{ApiResponse, rounds::entities::Round, users::entities::User};
use crate::services::{access::load_activity, current_user, error_response};
use crate::storage::Storage;

/// 结束当前轮次并开启新一轮，旧轮次的问题归档
pub async fn start_new_round(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    now: DateTime<Utc>,
) -> Result<Round> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_entries, "manage_entries")?;

    let round = storage.start_new_round(hotquestion_id, now).await?;
    info!(
        "User {} started round {} of hotquestion {}",
        user.id, round.id, hotquestion_id
    );
    Ok(round)
}

pub async fn start_round(
    service: &RoundService,
    request: &HttpRequest,
    hotquestion_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match start_new_round(storage.as_ref(), &user, hotquestion_id, Utc::now()).await {
        Ok(round) => Ok(HttpResponse::Created().json(ApiResponse::success(
            round,
            "New round started successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HotQuestionError;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    #[tokio::test]
    async fn test_exactly_one_open_round() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;

        for ts in [1_100, 1_200, 1_300] {
            start_new_round(storage.as_ref(), &room.teacher, hq.id, at(ts))
                .await
                .expect("start round");
        }

        let rounds = storage.list_rounds(hq.id).await.expect("rounds");
        assert_eq!(rounds.len(), 4);
        assert_eq!(rounds.iter().filter(|r| r.is_open()).count(), 1);
        assert_eq!(rounds[0].end_time, Some(at(1_100)));
        assert!(rounds[3].is_open());
        assert_eq!(rounds[3].start_time, at(1_300));
    }

    #[tokio::test]
    async fn test_students_cannot_start_round() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;

        let result = start_new_round(storage.as_ref(), &room.students[0], hq.id, at(1_100)).await;
        assert!(matches!(result, Err(HotQuestionError::Authorization(_))));
    }
}
