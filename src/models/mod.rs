//! 业务数据模型
//!
//! 与 `entity` 中的数据库实体分离，用于 API 请求/响应与服务层。

pub mod auth;
pub mod calendar;
pub mod comments;
pub mod common;
pub mod courses;
pub mod grades;
pub mod hotquestions;
pub mod privacy;
pub mod questions;
pub mod rounds;
pub mod users;
pub mod votes;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
