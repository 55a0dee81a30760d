use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::{
    comments::requests::CreateCommentRequest,
    questions::requests::{CreateQuestionRequest, PriorityRequest},
    rounds::requests::RoundQuery,
};
use crate::services::{CommentService, QuestionService, VoteService};
use crate::utils::{SafeCommentId, SafeHotQuestionId, SafeQuestionId};

static QUESTION_SERVICE: Lazy<QuestionService> = Lazy::new(QuestionService::new_lazy);
static VOTE_SERVICE: Lazy<VoteService> = Lazy::new(VoteService::new_lazy);
static COMMENT_SERVICE: Lazy<CommentService> = Lazy::new(CommentService::new_lazy);

pub async fn view_round(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    query: web::Query<RoundQuery>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .view_round(&req, hotquestion_id.0, query.into_inner())
        .await
}

pub async fn create_question(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    data: web::Json<CreateQuestionRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .create_question(&req, hotquestion_id.0, data.into_inner())
        .await
}

pub async fn export_questions(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    query: web::Query<RoundQuery>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .export_questions(&req, hotquestion_id.0, query.into_inner())
        .await
}

pub async fn delete_question(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .delete_question(&req, hotquestion_id.0, question_id.0)
        .await
}

pub async fn approve_question(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .approve_question(&req, hotquestion_id.0, question_id.0)
        .await
}

pub async fn prioritize_question(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
    data: web::Json<PriorityRequest>,
) -> ActixResult<HttpResponse> {
    QUESTION_SERVICE
        .prioritize_question(&req, hotquestion_id.0, question_id.0, data.direction)
        .await
}

pub async fn vote(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
) -> ActixResult<HttpResponse> {
    VOTE_SERVICE
        .vote(&req, hotquestion_id.0, question_id.0)
        .await
}

pub async fn unvote(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
) -> ActixResult<HttpResponse> {
    VOTE_SERVICE
        .unvote(&req, hotquestion_id.0, question_id.0)
        .await
}

pub async fn list_comments(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .list_comments(&req, hotquestion_id.0, question_id.0)
        .await
}

pub async fn create_comment(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    question_id: SafeQuestionId,
    data: web::Json<CreateCommentRequest>,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .create_comment(&req, hotquestion_id.0, question_id.0, data.into_inner())
        .await
}

pub async fn delete_comment(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    comment_id: SafeCommentId,
) -> ActixResult<HttpResponse> {
    COMMENT_SERVICE
        .delete_comment(&req, hotquestion_id.0, comment_id.0)
        .await
}

// 挂在 /hotquestions/{hotquestion_id} 作用域内；/questions/export 需先于 /questions/{question_id}
pub fn configure_question_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/questions")
            .route(web::get().to(view_round))
            .route(web::post().to(create_question).wrap(RateLimit::question_post())),
    )
    .route("/questions/export", web::get().to(export_questions))
    .route("/questions/{question_id}", web::delete().to(delete_question))
    .route(
        "/questions/{question_id}/approve",
        web::post().to(approve_question),
    )
    .route(
        "/questions/{question_id}/priority",
        web::post().to(prioritize_question),
    )
    .service(
        web::resource("/questions/{question_id}/vote")
            .wrap(RateLimit::vote())
            .route(web::put().to(vote))
            .route(web::delete().to(unvote)),
    )
    .service(
        web::resource("/questions/{question_id}/comments")
            .route(web::get().to(list_comments))
            .route(web::post().to(create_comment)),
    )
    .route("/comments/{comment_id}", web::delete().to(delete_comment));
}
