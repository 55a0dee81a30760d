use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::TimeDelta;
use tracing::{info, warn};

use super::AuthService;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::{User, UserStatus},
};
use crate::services::{error_response, error_response_with};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

/// 用户名或邮箱 + 密码校验；失败时不区分用户不存在与密码错误
pub async fn authenticate(storage: &dyn Storage, identifier: &str, password: &str) -> Result<User> {
    let user = storage
        .get_user_by_username_or_email(identifier.trim())
        .await?
        .filter(|user| verify_password(password, &user.password_hash))
        .ok_or_else(|| HotQuestionError::authentication("Username or password is incorrect"))?;

    if user.status != UserStatus::Active {
        return Err(HotQuestionError::authentication(format!(
            "Account is {}",
            user.status
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login of user {}: {e}", user.id);
    }
    Ok(user)
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let user = match authenticate(
        storage.as_ref(),
        &login_request.username,
        &login_request.password,
    )
    .await
    {
        Ok(user) => user,
        Err(e) => return Ok(error_response_with(ErrorCode::AuthFailed, &e)),
    };

    let refresh_ttl = if login_request.remember_me {
        TimeDelta::days(config.jwt.refresh_token_remember_me_expiry)
    } else {
        TimeDelta::days(config.jwt.refresh_token_expiry)
    };

    let token_pair = match user.generate_token_pair(Some(refresh_ttl)) {
        Ok(pair) => pair,
        Err(e) => return Ok(error_response(&e)),
    };

    info!("User {} logged in", user.username);

    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_refresh_token_cookie(
            &token_pair.refresh_token,
            refresh_ttl,
        ))
        .json(ApiResponse::success(response, "Login successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Argon2Config;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::services::test_support::storage;
    use crate::utils::password::hash_with_params;

    async fn seeded(storage: &dyn Storage) -> User {
        let params = Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        };
        storage
            .create_user(CreateUserRequest {
                username: "alice".to_string(),
                email: "alice@school.edu".to_string(),
                password: hash_with_params("Secret123", &params).expect("hash"),
                role: UserRole::User,
                display_name: None,
            })
            .await
            .expect("create user")
    }

    #[tokio::test]
    async fn test_login_by_username_or_email() {
        let storage = storage().await;
        let alice = seeded(storage.as_ref()).await;

        let by_name = authenticate(storage.as_ref(), "alice", "Secret123")
            .await
            .expect("login by username");
        assert_eq!(by_name.id, alice.id);

        let by_email = authenticate(storage.as_ref(), "alice@school.edu", "Secret123")
            .await
            .expect("login by email");
        assert_eq!(by_email.id, alice.id);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let storage = storage().await;
        seeded(storage.as_ref()).await;

        let wrong = authenticate(storage.as_ref(), "alice", "Secret124")
            .await
            .unwrap_err();
        let unknown = authenticate(storage.as_ref(), "bob", "Secret123")
            .await
            .unwrap_err();
        assert_eq!(wrong.code(), "E012");
        assert_eq!(wrong.message(), unknown.message());
    }
}
