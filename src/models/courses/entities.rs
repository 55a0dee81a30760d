use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程内角色
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum CourseUserRole {
    Student, // 学生
    Teacher, // 教师
}

impl<'de> Deserialize<'de> for CourseUserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CourseUserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的课程角色: '{s}'. 支持的角色: student, teacher"
            ))
        })
    }
}

impl std::fmt::Display for CourseUserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseUserRole::Student => write!(f, "student"),
            CourseUserRole::Teacher => write!(f, "teacher"),
        }
    }
}

impl std::str::FromStr for CourseUserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(CourseUserRole::Student),
            "teacher" => Ok(CourseUserRole::Teacher),
            _ => Err(format!("Invalid course user role: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseUser {
    pub id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub role: CourseUserRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}
