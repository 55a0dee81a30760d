//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400。

use std::future::{Ready, ready};

use actix_web::{Error, FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 读取并校验正整数路径参数
pub fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_request(format!("Missing path parameter: {name}")))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_request(format!("Invalid {name}: {raw}"))),
    }
}

macro_rules! define_safe_id {
    ($(#[$meta:meta])* $name:ident, $param:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id!(
    /// `{course_id}`
    SafeCourseId,
    "course_id"
);
define_safe_id!(
    /// `{hotquestion_id}`
    SafeHotQuestionId,
    "hotquestion_id"
);
define_safe_id!(SafeQuestionId, "question_id");
define_safe_id!(SafeRoundId, "round_id");
define_safe_id!(SafeCommentId, "comment_id");
define_safe_id!(SafeUserId, "user_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_id() {
        let req = TestRequest::default()
            .param("hotquestion_id", "42")
            .to_http_request();
        assert_eq!(parse_positive_id(&req, "hotquestion_id").ok(), Some(42));

        let req = TestRequest::default()
            .param("hotquestion_id", "-1")
            .to_http_request();
        assert!(parse_positive_id(&req, "hotquestion_id").is_err());

        let req = TestRequest::default()
            .param("hotquestion_id", "abc")
            .to_http_request();
        assert!(parse_positive_id(&req, "hotquestion_id").is_err());

        let req = TestRequest::default().to_http_request();
        assert!(parse_positive_id(&req, "round_id").is_err());
    }
}
