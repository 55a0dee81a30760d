use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AuthService;
use crate::config::Argon2Config;
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, RegisterRequest},
    },
};
use crate::services::error_response_with;
use crate::storage::Storage;
use crate::utils::password::hash_with_params;
use crate::utils::validate::{validate_email, validate_password, validate_username};

/// 自助注册，新用户总是普通用户
pub async fn register_user(
    storage: &dyn Storage,
    req: RegisterRequest,
    argon2: &Argon2Config,
) -> Result<User> {
    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&req.password)?;

    if storage.get_user_by_username(&username).await?.is_some() {
        return Err(HotQuestionError::conflict("Username already exists"));
    }
    if storage.get_user_by_email(&email).await?.is_some() {
        return Err(HotQuestionError::conflict("Email already exists"));
    }

    let display_name = req
        .display_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    storage
        .create_user(CreateUserRequest {
            username,
            email,
            password: hash_with_params(&req.password, argon2)?,
            role: UserRole::User,
            display_name,
        })
        .await
}

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let argon2 = &service.get_config().argon2;

    match register_user(storage.as_ref(), register_request, argon2).await {
        Ok(user) => {
            info!("User {} registered", user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(user, "Registered")))
        }
        Err(e @ HotQuestionError::Conflict(_)) => {
            Ok(error_response_with(ErrorCode::UserAlreadyExists, &e))
        }
        Err(e) => Ok(error_response_with(ErrorCode::RegisterFailed, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::storage;

    fn cheap() -> Argon2Config {
        Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "Secret123".to_string(),
            display_name: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_creates_plain_user() {
        let storage = storage().await;
        let user = register_user(
            storage.as_ref(),
            request(" carol ", "Carol@School.edu"),
            &cheap(),
        )
        .await
        .expect("register");

        assert_eq!(user.username, "carol");
        assert_eq!(user.email, "carol@school.edu");
        assert_eq!(user.role, UserRole::User);
        assert!(user.display_name.is_none());
        assert_ne!(user.password_hash, "Secret123");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_weak_input() {
        let storage = storage().await;
        register_user(storage.as_ref(), request("carol", "carol@school.edu"), &cheap())
            .await
            .expect("register");

        let err = register_user(storage.as_ref(), request("carol", "other@school.edu"), &cheap())
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Conflict(_)));

        let err = register_user(storage.as_ref(), request("dave", "carol@school.edu"), &cheap())
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Conflict(_)));

        let mut weak = request("erin", "erin@school.edu");
        weak.password = "short".to_string();
        let err = register_user(storage.as_ref(), weak, &cheap())
            .await
            .unwrap_err();
        assert!(matches!(err, HotQuestionError::Validation(_)));
    }
}
