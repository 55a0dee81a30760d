/*!
 * 系统角色校验中间件，必须挂在 RequireJWT 之后
 *
 * ```rust,ignore
 * web::scope("/courses")
 *     .wrap(RequireRole::any(UserRole::teacher_roles()))
 *     .wrap(RequireJWT)
 * ```
 *
 * 课程内角色（课程教师/学生）不在这里判断，由服务层按课程成员关系解析。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

#[derive(Clone)]
pub struct RequireRole {
    allowed: Vec<UserRole>,
}

impl RequireRole {
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed: vec![role.clone()],
        }
    }

    /// 任一角色即可
    pub fn any(roles: &[&UserRole]) -> Self {
        Self {
            allowed: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(&self, role: &UserRole) -> bool {
        self.allowed.contains(role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            rule: self.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    rule: RequireRole,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let rule = self.rule.clone();

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            let Some(user) = user else {
                info!("Role check without authenticated user on {}", req.path());
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            if !rule.permits(&user.role) {
                info!(
                    "Access denied for user {} (role: {}). Allowed: {:?}",
                    user.id, user.role, rule.allowed
                );
                return Ok(req.into_response(
                    create_error_response(StatusCode::FORBIDDEN, ErrorCode::Forbidden, "Access denied")
                        .map_into_right_body(),
                ));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_sets() {
        let teachers = RequireRole::any(UserRole::teacher_roles());
        assert!(teachers.permits(&UserRole::Teacher));
        assert!(teachers.permits(&UserRole::Admin));
        assert!(!teachers.permits(&UserRole::User));

        let admin = RequireRole::new(&UserRole::Admin);
        assert!(!admin.permits(&UserRole::Teacher));
    }
}
