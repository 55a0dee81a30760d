pub mod access;
pub mod auth;
pub mod calendar;
pub mod comments;
pub mod courses;
pub mod grades;
pub mod hotquestions;
pub mod privacy;
pub mod questions;
pub mod rounds;
pub mod votes;

pub use auth::AuthService;
pub use comments::CommentService;
pub use courses::CourseService;
pub use grades::GradeService;
pub use hotquestions::HotQuestionService;
pub use privacy::PrivacyService;
pub use questions::QuestionService;
pub use rounds::RoundService;
pub use votes::VoteService;

use actix_web::{HttpRequest, HttpResponse};
use tracing::error;

use crate::errors::{HotQuestionError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};

/// 从请求中取出已认证用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user_claims(request)
        .ok_or_else(|| HotQuestionError::authentication("Unauthorized: missing user"))
}

/// 业务错误转换为 HTTP 响应
pub(crate) fn error_response(err: &HotQuestionError) -> HttpResponse {
    let code = ErrorCode::from(err);
    let body = ApiResponse::error_empty(code, err.message());
    match err {
        HotQuestionError::NotFound(_) => HttpResponse::NotFound().json(body),
        HotQuestionError::Validation(_) => HttpResponse::BadRequest().json(body),
        HotQuestionError::Conflict(_) | HotQuestionError::HeatExhausted(_) => {
            HttpResponse::Conflict().json(body)
        }
        HotQuestionError::Authentication(_) => HttpResponse::Unauthorized().json(body),
        HotQuestionError::Authorization(_) | HotQuestionError::ActivityClosed(_) => {
            HttpResponse::Forbidden().json(body)
        }
        _ => {
            error!("{}", err.format_simple());
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Internal server error",
            ))
        }
    }
}

/// 用指定错误码覆盖默认映射
pub(crate) fn error_response_with(code: ErrorCode, err: &HotQuestionError) -> HttpResponse {
    let body = ApiResponse::error_empty(code, err.message());
    match err {
        HotQuestionError::NotFound(_) => HttpResponse::NotFound().json(body),
        HotQuestionError::Validation(_) => HttpResponse::BadRequest().json(body),
        HotQuestionError::Conflict(_) | HotQuestionError::HeatExhausted(_) => {
            HttpResponse::Conflict().json(body)
        }
        HotQuestionError::Authentication(_) => HttpResponse::Unauthorized().json(body),
        HotQuestionError::Authorization(_) | HotQuestionError::ActivityClosed(_) => {
            HttpResponse::Forbidden().json(body)
        }
        _ => error_response(err),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! 服务层测试用的内存数据库与样例数据

    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::{
        courses::{
            entities::{Course, CourseUserRole},
            requests::CreateCourseRequest,
        },
        hotquestions::{entities::HotQuestion, requests::CreateHotQuestionRequest},
        users::{
            entities::{User, UserRole},
            requests::CreateUserRequest,
        },
    };
    use crate::storage::{Storage, sea_orm_storage::SeaOrmStorage};

    pub fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).single().expect("valid timestamp")
    }

    pub async fn storage() -> Arc<dyn Storage> {
        Arc::new(
            SeaOrmStorage::new_in_memory()
                .await
                .expect("in-memory storage"),
        )
    }

    pub async fn user(storage: &dyn Storage, name: &str, role: UserRole) -> User {
        storage
            .create_user(CreateUserRequest {
                username: name.to_string(),
                email: format!("{name}@example.com"),
                password: "hash".to_string(),
                role,
                display_name: None,
            })
            .await
            .expect("create user")
    }

    /// 教师创建的课程，附带若干学生
    pub struct Classroom {
        pub teacher: User,
        pub students: Vec<User>,
        pub course: Course,
    }

    pub async fn classroom(storage: &dyn Storage, students: usize) -> Classroom {
        let teacher = user(storage, "teacher", UserRole::Teacher).await;
        let course = storage
            .create_course(
                teacher.id,
                CreateCourseRequest {
                    name: "Physics".to_string(),
                    description: None,
                },
            )
            .await
            .expect("create course");

        let mut members = Vec::new();
        for i in 0..students {
            let student = user(storage, &format!("student{i}"), UserRole::User).await;
            storage
                .enrol_user(course.id, student.id, CourseUserRole::Student)
                .await
                .expect("enrol student");
            members.push(student);
        }

        Classroom {
            teacher,
            students: members,
            course,
        }
    }

    pub fn activity_request(name: &str) -> CreateHotQuestionRequest {
        CreateHotQuestionRequest {
            name: name.to_string(),
            intro: None,
            anonymous_post: true,
            require_approval: false,
            heat_limit: 0,
            time_open: 0,
            time_close: 0,
            view_after_close: false,
            question_label: None,
            priority_label: None,
            heat_label: None,
            remove_label: None,
            approval_label: None,
            grade_max: 10.0,
            factor_priority: 100,
            factor_heat: 100,
            factor_vote: 100,
            completion_post: 0,
            completion_vote: 0,
        }
    }

    pub async fn activity(
        storage: &dyn Storage,
        classroom: &Classroom,
        req: CreateHotQuestionRequest,
    ) -> HotQuestion {
        crate::services::hotquestions::create::add_instance(
            storage,
            &classroom.teacher,
            classroom.course.id,
            req,
            at(1_000),
        )
        .await
        .expect("create activity")
    }
}
