use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse,
    courses::{entities::Course, requests::CreateCourseRequest},
    users::entities::{User, UserRole},
};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

/// 系统教师或管理员可建课，创建者自动成为课程教师
pub async fn create_course(
    storage: &dyn Storage,
    user: &User,
    req: CreateCourseRequest,
) -> Result<Course> {
    if !UserRole::teacher_roles().contains(&&user.role) {
        return Err(HotQuestionError::authorization(
            "Only teachers can create courses",
        ));
    }

    let name = req.name.trim().to_string();
    if name.is_empty() || name.chars().count() > 255 {
        return Err(HotQuestionError::validation(
            "Course name must be 1 to 255 characters",
        ));
    }
    let description = req
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    let course = storage
        .create_course(user.id, CreateCourseRequest { name, description })
        .await?;
    info!("Course {} created by user {}", course.id, user.id);
    Ok(course)
}

pub async fn create_course_handler(
    service: &CourseService,
    request: &HttpRequest,
    req: CreateCourseRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = match current_user(request) {
        Ok(user) => create_course(storage.as_ref(), &user, req).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(course) => Ok(HttpResponse::Created().json(ApiResponse::success(course, "Course created"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::entities::CourseUserRole;
    use crate::services::test_support::{storage, user};

    fn request(name: &str) -> CreateCourseRequest {
        CreateCourseRequest {
            name: name.to_string(),
            description: Some("   ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_teacher_creates_course_and_is_enrolled() {
        let storage = storage().await;
        let teacher = user(storage.as_ref(), "teacher", UserRole::Teacher).await;

        let course = create_course(storage.as_ref(), &teacher, request("  Chemistry "))
            .await
            .expect("create course");
        assert_eq!(course.name, "Chemistry");
        assert!(course.description.is_none());

        let member = storage
            .get_course_user(course.id, teacher.id)
            .await
            .expect("query")
            .expect("enrolled");
        assert_eq!(member.role, CourseUserRole::Teacher);
    }

    #[tokio::test]
    async fn test_plain_user_and_blank_name_rejected() {
        let storage = storage().await;
        let student = user(storage.as_ref(), "student", UserRole::User).await;
        let teacher = user(storage.as_ref(), "teacher", UserRole::Teacher).await;

        let err = create_course(storage.as_ref(), &student, request("Chemistry"))
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Authorization(_)));

        let err = create_course(storage.as_ref(), &teacher, request("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Validation(_)));
    }
}
