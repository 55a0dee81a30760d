use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::hotquestions::{create_hotquestion, list_course_hotquestions};
use crate::middlewares;
use crate::models::courses::requests::{CourseListParams, CreateCourseRequest, EnrolUserRequest};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::SafeCourseId;

static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseListParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeCourseId) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn list_course_users(
    req: HttpRequest,
    course_id: SafeCourseId,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_course_users(&req, course_id.0).await
}

pub async fn enrol_user(
    req: HttpRequest,
    course_id: SafeCourseId,
    enrol_data: web::Json<EnrolUserRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .enrol_user(&req, course_id.0, enrol_data.into_inner())
        .await
}

// 配置路由
pub fn configure_courses_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/courses")
            .wrap(middlewares::RequireJWT)
            .service(
                // 成员看到自己的课程，管理员看到全部
                web::resource("").route(web::get().to(list_courses)).route(
                    web::post()
                        .to(create_course)
                        .wrap(middlewares::RequireRole::any(UserRole::teacher_roles())),
                ),
            )
            .service(web::resource("/{course_id}").route(web::get().to(get_course)))
            .service(
                // 课程教师登记成员，在服务层校验
                web::resource("/{course_id}/users")
                    .route(web::get().to(list_course_users))
                    .route(web::post().to(enrol_user)),
            )
            .service(
                web::resource("/{course_id}/hotquestions")
                    .route(web::get().to(list_course_hotquestions))
                    .route(web::post().to(create_hotquestion)),
            ),
    );
}
