pub mod create;
pub mod get;
pub mod list;
pub mod members;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{HotQuestionError, Result};
use crate::models::{
    courses::{
        entities::{Course, CourseUserRole},
        requests::{CourseListParams, CreateCourseRequest, EnrolUserRequest},
    },
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_course(
        &self,
        request: &HttpRequest,
        req: CreateCourseRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course_handler(self, request, req).await
    }

    pub async fn get_course(&self, request: &HttpRequest, course_id: i64) -> ActixResult<HttpResponse> {
        get::get_course_handler(self, request, course_id).await
    }

    pub async fn list_courses(
        &self,
        request: &HttpRequest,
        query: CourseListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_courses_handler(self, request, query).await
    }

    pub async fn enrol_user(
        &self,
        request: &HttpRequest,
        course_id: i64,
        req: EnrolUserRequest,
    ) -> ActixResult<HttpResponse> {
        members::enrol_user_handler(self, request, course_id, req).await
    }

    pub async fn list_course_users(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        members::list_course_users_handler(self, request, course_id).await
    }
}

/// 加载课程及当前用户的课程角色；非成员且非管理员时拒绝
pub(crate) async fn load_course(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> Result<(Course, Option<CourseUserRole>)> {
    let course = storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| HotQuestionError::not_found("Course not found"))?;

    let role = super::access::course_role(storage, user, course_id).await?;
    if role.is_none() && user.role != UserRole::Admin {
        return Err(HotQuestionError::authorization("Not a member of this course"));
    }
    Ok((course, role))
}

/// 课程教师或管理员
pub(crate) fn can_manage_course(user: &User, role: Option<&CourseUserRole>) -> bool {
    user.role == UserRole::Admin || role == Some(&CourseUserRole::Teacher)
}
