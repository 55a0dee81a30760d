use actix_web::cookie::{Cookie, SameSite};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::{HotQuestionError, Result};

const REFRESH_COOKIE: &str = "refresh_token";

/// Token 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,           // 用户 ID
    pub role: String,          // 系统角色
    pub token_type: TokenKind, // access / refresh
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| HotQuestionError::authentication("Token 中的用户 ID 无效"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    /// 使用给定密钥签发 token
    pub fn issue(
        secret: &str,
        user_id: i64,
        role: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| HotQuestionError::authentication(format!("签发 token 失败: {e}")))
    }

    /// 校验签名、过期时间与 token 类型
    pub fn verify(secret: &str, token: &str, expected: TokenKind) -> Result<Claims> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                HotQuestionError::authentication("Token 已过期")
            }
            _ => HotQuestionError::authentication(format!("Token 无效: {e}")),
        })?;

        if claims.token_type != expected {
            return Err(HotQuestionError::authentication("Token 类型不匹配"));
        }
        Ok(claims)
    }

    // 生成 access + refresh token 对，refresh 有效期可由“记住我”覆盖
    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<TimeDelta>,
    ) -> Result<TokenPair> {
        let config = &AppConfig::get().jwt;
        let now = Utc::now();
        let refresh_ttl =
            refresh_token_expiry.unwrap_or_else(|| TimeDelta::days(config.refresh_token_expiry));

        Ok(TokenPair {
            access_token: Self::issue(
                &config.secret,
                user_id,
                role,
                TokenKind::Access,
                now,
                TimeDelta::minutes(config.access_token_expiry),
            )?,
            refresh_token: Self::issue(
                &config.secret,
                user_id,
                role,
                TokenKind::Refresh,
                now,
                refresh_ttl,
            )?,
        })
    }

    pub fn verify_access_token(token: &str) -> Result<Claims> {
        Self::verify(&AppConfig::get().jwt.secret, token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims> {
        Self::verify(&AppConfig::get().jwt.secret, token, TokenKind::Refresh)
    }

    // 使用 Refresh Token 换取新的 Access Token
    pub fn refresh_access_token(refresh_token: &str) -> Result<String> {
        let config = &AppConfig::get().jwt;
        let claims = Self::verify(&config.secret, refresh_token, TokenKind::Refresh)?;
        Self::issue(
            &config.secret,
            claims.user_id()?,
            &claims.role,
            TokenKind::Access,
            Utc::now(),
            TimeDelta::minutes(config.access_token_expiry),
        )
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(refresh_token: &str, max_age: TimeDelta) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                max_age.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_issue_and_verify() {
        let token = JwtUtils::issue(
            SECRET,
            42,
            "teacher",
            TokenKind::Access,
            Utc::now(),
            TimeDelta::minutes(5),
        )
        .expect("issue");

        let claims = JwtUtils::verify(SECRET, &token, TokenKind::Access).expect("verify");
        assert_eq!(claims.user_id().expect("id"), 42);
        assert_eq!(claims.role, "teacher");
    }

    #[test]
    fn test_wrong_kind_rejected() {
        let token = JwtUtils::issue(
            SECRET,
            1,
            "user",
            TokenKind::Refresh,
            Utc::now(),
            TimeDelta::days(1),
        )
        .expect("issue");

        let err = JwtUtils::verify(SECRET, &token, TokenKind::Access).unwrap_err();
        assert_eq!(err.code(), "E012");
    }

    #[test]
    fn test_expired_and_foreign_tokens_rejected() {
        let expired = JwtUtils::issue(
            SECRET,
            1,
            "user",
            TokenKind::Access,
            Utc::now() - TimeDelta::hours(2),
            TimeDelta::minutes(5),
        )
        .expect("issue");
        assert!(JwtUtils::verify(SECRET, &expired, TokenKind::Access).is_err());

        let foreign = JwtUtils::issue(
            "another-secret",
            1,
            "user",
            TokenKind::Access,
            Utc::now(),
            TimeDelta::minutes(5),
        )
        .expect("issue");
        assert!(JwtUtils::verify(SECRET, &foreign, TokenKind::Access).is_err());
    }
}
