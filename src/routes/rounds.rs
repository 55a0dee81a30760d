use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::RoundService;
use crate::utils::{SafeHotQuestionId, SafeRoundId};

static ROUND_SERVICE: Lazy<RoundService> = Lazy::new(RoundService::new_lazy);

pub async fn list_rounds(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    ROUND_SERVICE.list_rounds(&req, hotquestion_id.0).await
}

pub async fn start_round(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
) -> ActixResult<HttpResponse> {
    ROUND_SERVICE.start_round(&req, hotquestion_id.0).await
}

pub async fn remove_round(
    req: HttpRequest,
    hotquestion_id: SafeHotQuestionId,
    round_id: SafeRoundId,
) -> ActixResult<HttpResponse> {
    ROUND_SERVICE
        .remove_round(&req, hotquestion_id.0, round_id.0)
        .await
}

// 挂在 /hotquestions/{hotquestion_id} 作用域内
pub fn configure_round_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/rounds")
            .route(web::get().to(list_rounds))
            .route(web::post().to(start_round)),
    )
    .route("/rounds/{round_id}", web::delete().to(remove_round));
}
