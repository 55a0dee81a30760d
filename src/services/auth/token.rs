use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::AuthService;
use crate::models::{
    ApiResponse, ErrorCode, auth::RefreshTokenResponse, users::responses::UserResponse,
};
use crate::services::{current_user, error_response};
use crate::utils::jwt::JwtUtils;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    match JwtUtils::refresh_access_token(&refresh_token) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: service.get_config().jwt.access_token_expiry * 60,
            },
            "Token refreshed",
        ))),
        Err(e) => {
            warn!("Refresh token rejected: {e}");
            // 清除无效的 refresh token cookie
            Ok(HttpResponse::Unauthorized()
                .cookie(JwtUtils::create_empty_refresh_token_cookie())
                .json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Login expired or invalid, please login again",
                )))
        }
    }
}

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match current_user(request) {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserResponse { user },
            "Current user",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
