//! 请求参数解析失败时返回统一格式的 400 响应

use actix_web::{
    Error, HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(kind: &str, detail: String, req: &HttpRequest) -> Error {
    debug!("Rejected {} for {}: {}", kind, req.path(), detail);
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("Invalid {kind}: {detail}"),
    ));
    InternalError::from_response(detail, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    bad_request("request body", err.to_string(), req)
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    bad_request("query parameters", err.to_string(), req)
}
