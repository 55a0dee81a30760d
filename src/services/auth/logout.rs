use actix_web::{HttpResponse, Result as ActixResult};

use crate::models::ApiResponse;
use crate::utils::jwt::JwtUtils;

/// 清除 refresh_token cookie（max_age=0）
pub async fn handle_logout() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::<()>::success_empty("Logged out")))
}
