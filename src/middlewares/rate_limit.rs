/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个键（已认证用户按用户 ID，否则按客户端 IP）在窗口内
 * 最多放行 `max_requests` 次，超出返回 429 并带 `Retry-After`。
 *
 * ```rust,ignore
 * web::scope("/api/v1/auth")
 *     .service(web::resource("/login").wrap(RateLimit::login()).route(web::post().to(login)))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

/// 键: 前缀:标识，值: (窗口起点秒, 已用次数)
static RATE_LIMIT_CACHE: Lazy<Cache<String, (i64, u32)>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口（秒）
    window_secs: u64,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
}

impl RateLimit {
    /// 创建新的速率限制器
    ///
    /// # 参数
    /// - `max_requests`: 时间窗口内允许的最大请求数
    /// - `window_secs`: 时间窗口（秒）
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5 次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3 次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    pub fn refresh_token() -> Self {
        Self::new(10, 60).with_prefix("refresh")
    }

    /// 提问：20 次/分钟/用户
    pub fn question_post() -> Self {
        Self::new(20, 60).with_prefix("question")
    }

    /// 投票切换：60 次/分钟/用户
    pub fn vote() -> Self {
        Self::new(60, 60).with_prefix("vote")
    }
}

/// 推进固定窗口：返回新的 (窗口起点, 计数)，超限时返回剩余等待秒数
fn advance_window(
    entry: Option<(i64, u32)>,
    now: i64,
    window_secs: u64,
    max_requests: u32,
) -> Result<(i64, u32), u64> {
    let window = window_secs as i64;
    let (started, used) = entry
        .filter(|(started, _)| now < started + window)
        .unwrap_or((now, 0));

    if used >= max_requests {
        return Err((started + window - now).max(1) as u64);
    }
    Ok((started, used + 1))
}

/// 客户端 IP：连接信息优先，其次 X-Forwarded-For 首项、X-Real-IP
fn extract_client_ip(req: &ServiceRequest) -> String {
    // 尝试从连接信息获取真实 IP（最可信）
    let connection_ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    // 如果连接信息有有效 IP，优先使用
    if let Some(ref ip) = connection_ip
        && is_valid_ip(ip)
    {
        return ip.clone();
    }

    // 从 X-Forwarded-For 头获取（用于反向代理场景）
    // 只取第一个 IP（最接近客户端的）
    if let Some(forwarded) = req.headers().get("X-Forwarded-For")
        && let Ok(value) = forwarded.to_str()
        && let Some(ip) = value.split(',').next()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 从 X-Real-IP 头获取
    if let Some(real_ip) = req.headers().get("X-Real-IP")
        && let Ok(ip) = real_ip.to_str()
    {
        let ip = ip.trim();
        if is_valid_ip(ip) {
            return ip.to_string();
        }
    }

    // 如果都没有有效 IP，使用连接信息的默认值
    connection_ip.unwrap_or_else(|| "unknown".to_string())
}

/// 验证 IP 地址格式是否有效
fn is_valid_ip(ip: &str) -> bool {
    use std::net::IpAddr;
    ip.parse::<IpAddr>().is_ok()
}

/// 从请求中提取用户 ID（如果已认证）
fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

/// 创建速率限制错误响应
fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "请求过于频繁，请稍后再试",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            max_requests: self.max_requests,
            window_secs: self.window_secs,
            key_prefix: self.key_prefix.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let max_requests = self.max_requests;
        let window_secs = self.window_secs;
        let key_prefix = self.key_prefix.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));

            let cache_key = if key_prefix.is_empty() {
                identifier
            } else {
                format!("{key_prefix}:{identifier}")
            };

            let now = chrono::Utc::now().timestamp();
            let entry = RATE_LIMIT_CACHE.get(&cache_key).await;

            match advance_window(entry, now, window_secs, max_requests) {
                Ok((started, used)) => {
                    RATE_LIMIT_CACHE.insert(cache_key, (started, used)).await;
                    req.extensions_mut().insert(RateLimitInfo {
                        remaining: max_requests.saturating_sub(used),
                        limit: max_requests,
                        reset: (started + window_secs as i64 - now).max(0) as u64,
                    });
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(retry_after) => {
                    warn!("Rate limit exceeded for key: {cache_key} (limit {max_requests})");
                    Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

/// 速率限制信息（可在响应中添加）
#[derive(Clone)]
pub struct RateLimitInfo {
    pub remaining: u32,
    pub limit: u32,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(login.key_prefix, "login");
        assert_eq!(RateLimit::question_post().key_prefix, "question");
    }

    #[test]
    fn test_fixed_window() {
        let mut entry = None;
        for expected in 1..=3 {
            let next = advance_window(entry, 100, 60, 3).expect("within limit");
            assert_eq!(next, (100, expected));
            entry = Some(next);
        }

        assert_eq!(advance_window(entry, 130, 60, 3), Err(30));
        // 窗口结束后重新计数
        assert_eq!(advance_window(entry, 160, 60, 3), Ok((160, 1)));
    }
}
