use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{questions, rounds};
use crate::middlewares;
use crate::models::grades::requests::GradingTableParams;
use crate::models::hotquestions::requests::{CreateHotQuestionRequest, UpdateHotQuestionRequest};
use crate::services::{GradeService, HotQuestionService};
use crate::utils::{SafeCourseId, SafeHotQuestionId};

static HOTQUESTION_SERVICE: Lazy<HotQuestionService> = Lazy::new(HotQuestionService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// 课程下的活动，挂在 /courses/{course_id}/hotquestions
pub async fn list_course_hotquestions(
    req: HttpRequest,
    course_id: SafeCourseId,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .list_course_hotquestions(&req, course_id.0)
        .await
}

pub async fn create_hotquestion(
    req: HttpRequest,
    course_id: SafeCourseId,
    data: web::Json<CreateHotQuestionRequest>,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .create_hotquestion(&req, course_id.0, data.into_inner())
        .await
}

pub async fn get_hotquestion(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .get_hotquestion(&req, hotquestion_id.0)
        .await
}

pub async fn update_hotquestion(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    data: web::Json<UpdateHotQuestionRequest>,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .update_hotquestion(&req, hotquestion_id.0, data.into_inner())
        .await
}

pub async fn delete_hotquestion(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .delete_hotquestion(&req, hotquestion_id.0)
        .await
}

pub async fn reset_hotquestion(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .reset_hotquestion(&req, hotquestion_id.0)
        .await
}

pub async fn get_completion(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .get_completion(&req, hotquestion_id.0)
        .await
}

pub async fn list_calendar_events(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    HOTQUESTION_SERVICE
        .list_calendar_events(&req, hotquestion_id.0)
        .await
}

pub async fn grading_table(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    query: web::Query<GradingTableParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .grading_table(&req, hotquestion_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_hotquestions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/hotquestions/{hotquestion_id}")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(get_hotquestion))
                    .route(web::put().to(update_hotquestion))
                    .route(web::delete().to(delete_hotquestion)),
            )
            .route("/reset", web::post().to(reset_hotquestion))
            .route("/completion", web::get().to(get_completion))
            .route("/calendar", web::get().to(list_calendar_events))
            .route("/grades", web::get().to(grading_table))
            .configure(rounds::configure_round_routes)
            .configure(questions::configure_question_routes),
    );
}
