use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_course};
use crate::errors::Result;
use crate::models::{ApiResponse, courses::responses::CourseDetail, users::entities::User};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

pub async fn get_course(storage: &dyn Storage, user: &User, course_id: i64) -> Result<CourseDetail> {
    let (course, my_role) = load_course(storage, user, course_id).await?;
    Ok(CourseDetail { course, my_role })
}

pub async fn get_course_handler(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = match current_user(request) {
        Ok(user) => get_course(storage.as_ref(), &user, course_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Course retrieved"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::HotQuestionError;
    use crate::models::{courses::entities::CourseUserRole, users::entities::UserRole};
    use crate::services::test_support::{classroom, storage, user};

    #[tokio::test]
    async fn test_member_outsider_and_admin() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;

        let detail = get_course(storage.as_ref(), &room.students[0], room.course.id)
            .await
            .expect("member view");
        assert_eq!(detail.my_role, Some(CourseUserRole::Student));

        let outsider = user(storage.as_ref(), "outsider", UserRole::User).await;
        let err = get_course(storage.as_ref(), &outsider, room.course.id)
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Authorization(_)));

        let admin = user(storage.as_ref(), "admin", UserRole::Admin).await;
        let detail = get_course(storage.as_ref(), &admin, room.course.id)
            .await
            .expect("admin view");
        assert!(detail.my_role.is_none());

        let err = get_course(storage.as_ref(), &admin, 999).await.unwrap_err();
        assert!(matches!(err, HotQuestionError::NotFound(_)));
    }
}
