use serde::Serialize;
use ts_rs::TS;

use super::entities::{Course, CourseUser, CourseUserRole};
use crate::models::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseDetail {
    pub course: Course,
    pub my_role: Option<CourseUserRole>,
}

/// 课程成员（附带用户名）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseMember {
    #[serde(flatten)]
    #[ts(flatten)]
    pub member: CourseUser,
    pub username: String,
    pub display_name: Option<String>,
}
