use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, can_manage_course, load_course};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{entities::CourseUser, requests::EnrolUserRequest, responses::CourseMember},
    users::entities::User,
};
use crate::services::{current_user, error_response, error_response_with};
use crate::storage::Storage;

/// 课程教师或管理员登记成员，重复登记视为冲突
pub async fn enrol_user(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
    req: EnrolUserRequest,
) -> Result<CourseUser> {
    let (course, role) = load_course(storage, user, course_id).await?;
    if !can_manage_course(user, role.as_ref()) {
        return Err(HotQuestionError::authorization(
            "Only course teachers can enrol users",
        ));
    }

    if storage.get_user_by_id(req.user_id).await?.is_none() {
        return Err(HotQuestionError::not_found("User not found"));
    }
    if storage.get_course_user(course.id, req.user_id).await?.is_some() {
        return Err(HotQuestionError::conflict("User already enrolled"));
    }

    let member = storage.enrol_user(course.id, req.user_id, req.role).await?;
    info!(
        "User {} enrolled in course {} as {}",
        member.user_id, course.id, member.role
    );
    Ok(member)
}

pub async fn list_course_users(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> Result<Vec<CourseMember>> {
    let (course, _) = load_course(storage, user, course_id).await?;

    let members = storage.list_course_users(course.id, None).await?;
    let ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
    let users: HashMap<i64, User> = storage
        .list_users_by_ids(&ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(members
        .into_iter()
        .filter_map(|member| {
            let u = users.get(&member.user_id)?;
            Some(CourseMember {
                username: u.username.clone(),
                display_name: u.display_name.clone(),
                member,
            })
        })
        .collect())
}

pub async fn enrol_user_handler(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
    req: EnrolUserRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = match current_user(request) {
        Ok(user) => enrol_user(storage.as_ref(), &user, course_id, req).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(member) => Ok(HttpResponse::Created().json(ApiResponse::success(member, "User enrolled"))),
        Err(e @ HotQuestionError::Conflict(_)) => {
            Ok(error_response_with(ErrorCode::CourseAlreadyJoined, &e))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub async fn list_course_users_handler(
    service: &CourseService,
    request: &HttpRequest,
    course_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = match current_user(request) {
        Ok(user) => list_course_users(storage.as_ref(), &user, course_id).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items, "Course users retrieved"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{courses::entities::CourseUserRole, users::entities::UserRole};
    use crate::services::test_support::{classroom, storage, user};

    #[tokio::test]
    async fn test_teacher_enrols_once() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 0).await;
        let newcomer = user(storage.as_ref(), "newcomer", UserRole::User).await;
        let req = || EnrolUserRequest {
            user_id: newcomer.id,
            role: CourseUserRole::Student,
        };

        let member = enrol_user(storage.as_ref(), &room.teacher, room.course.id, req())
            .await
            .expect("enrol");
        assert_eq!(member.role, CourseUserRole::Student);

        let err = enrol_user(storage.as_ref(), &room.teacher, room.course.id, req())
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_student_cannot_enrol() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let newcomer = user(storage.as_ref(), "newcomer", UserRole::User).await;

        let err = enrol_user(
            storage.as_ref(),
            &room.students[0],
            room.course.id,
            EnrolUserRequest {
                user_id: newcomer.id,
                role: CourseUserRole::Teacher,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HotQuestionError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_member_listing_carries_usernames() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;

        let members = list_course_users(storage.as_ref(), &room.students[1], room.course.id)
            .await
            .expect("list");
        let names: Vec<&str> = members.iter().map(|m| m.username.as_str()).collect();
        assert_eq!(names, vec!["teacher", "student0", "student1"]);
    }
}
