use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::privacy::requests::DeleteUserDataQuery;
use crate::services::PrivacyService;
use crate::utils::SafeUserId;

static PRIVACY_SERVICE: Lazy<PrivacyService> = Lazy::new(PrivacyService::new_lazy);

pub async fn export_user_data(req: HttpRequest, user_id: SafeUserId) -> ActixResult<HttpResponse> {
    PRIVACY_SERVICE.export_user_data(&req, user_id.0).await
}

pub async fn delete_user_data(
    req: HttpRequest,
    user_id: SafeUserId,
    query: web::Query<DeleteUserDataQuery>,
) -> ActixResult<HttpResponse> {
    PRIVACY_SERVICE
        .delete_user_data(&req, user_id.0, query.into_inner())
        .await
}

// 本人或管理员，在服务层校验
pub fn configure_privacy_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users/{user_id}/data")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(export_user_data))
                    .route(web::delete().to(delete_user_data)),
            ),
    );
}
