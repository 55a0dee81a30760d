use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::HotQuestionService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse,
    hotquestions::responses::{CourseHotQuestionItem, HotQuestionListResponse},
    users::entities::User,
};
use crate::services::{access::resolve_capabilities, current_user, error_response};
use crate::storage::Storage;

/// 课程首页的参与统计：每个活动的问题数与当前用户的提问数
pub async fn list_course_instances(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    now: DateTime<Utc>,
) -> Result<Vec<CourseHotQuestionItem>> {
    storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("课程不存在: {course_id}")))?;

    let capabilities = resolve_capabilities(storage, user, course_id).await?;
    if !capabilities.view {
        return Err(HotQuestionError::authorization("没有权限查看该课程"));
    }

    let mut items = Vec::new();
    for hotquestion in storage.list_course_hotquestions(course_id).await? {
        let question_count = storage.count_questions(hotquestion.id, None).await?;
        let my_post_count = storage
            .count_questions(hotquestion.id, Some(user.id))
            .await?;
        items.push(CourseHotQuestionItem {
            id: hotquestion.id,
            is_open: hotquestion.is_open_at(now),
            name: hotquestion.name,
            question_count,
            my_post_count,
        });
    }

    Ok(items)
}

pub async fn list_course_hotquestions(
    service: &HotQuestionService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };

    match list_course_instances(storage.as_ref(), &user, course_id, Utc::now()).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            HotQuestionListResponse { items },
            "Hot questions retrieved successfully",
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
    async fn test_participation_counts() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let first = activity(storage.as_ref(), &room, activity_request("First")).await;
        activity(storage.as_ref(), &room, activity_request("Second")).await;

        for (i, student) in room.students.iter().enumerate() {
            post_question(
                storage.as_ref(),
                student,
                first.id,
                CreateQuestionRequest {
                    content: format!("Question {i}"),
                    anonymous: false,
                },
                500,
                at(1_100 + i as i64),
            )
            .await
            .expect("post");
        }

        let items = list_course_instances(
            storage.as_ref(),
            &room.students[0],
            room.course.id,
            at(1_200),
        )
        .await
        .expect("list");
        assert_eq!(items.len(), 2);
        let first_item = items.iter().find(|i| i.id == first.id).expect("first");
        assert_eq!(first_item.question_count, 2);
        assert_eq!(first_item.my_post_count, 1);
        assert!(items.iter().any(|i| i.question_count == 0));
    }
}
