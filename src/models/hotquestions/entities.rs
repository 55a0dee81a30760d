use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::courses::entities::CourseUserRole;
use crate::models::grades::entities::RatingFactors;
use crate::models::users::entities::UserRole;

pub const DEFAULT_QUESTION_LABEL: &str = "Question";
pub const DEFAULT_PRIORITY_LABEL: &str = "Priority";
pub const DEFAULT_HEAT_LABEL: &str = "Heat";
pub const DEFAULT_REMOVE_LABEL: &str = "Remove";
pub const DEFAULT_APPROVAL_LABEL: &str = "Approved";

/// 活动界面上的列标签
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct HotQuestionLabels {
    pub question: String,
    pub priority: String,
    pub heat: String,
    pub remove: String,
    pub approval: String,
}

impl Default for HotQuestionLabels {
    fn default() -> Self {
        Self {
            question: DEFAULT_QUESTION_LABEL.to_string(),
            priority: DEFAULT_PRIORITY_LABEL.to_string(),
            heat: DEFAULT_HEAT_LABEL.to_string(),
            remove: DEFAULT_REMOVE_LABEL.to_string(),
            approval: DEFAULT_APPROVAL_LABEL.to_string(),
        }
    }
}

/// Hot Question 活动实例
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct HotQuestion {
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub intro: Option<String>,
    // 是否允许匿名提问
    pub anonymous_post: bool,
    // 学生提问是否需要审核
    pub require_approval: bool,
    // 每轮可投票数，0 表示不限
    pub heat_limit: i32,
    pub time_open: Option<DateTime<Utc>>,
    pub time_close: Option<DateTime<Utc>>,
    // 关闭后学生是否仍可查看
    pub view_after_close: bool,
    pub labels: HotQuestionLabels,
    // 成绩满分，0 表示不评分
    pub grade_max: f64,
    pub factor_priority: i32,
    pub factor_heat: i32,
    pub factor_vote: i32,
    pub completion_post: i32,
    pub completion_vote: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HotQuestion {
    /// 当前是否可提问/投票
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        let opened = self.time_open.is_none_or(|open| now >= open);
        let not_closed = self.time_close.is_none_or(|close| now < close);
        opened && not_closed
    }

    /// 当前用户是否可查看问题列表
    pub fn is_viewable_at(&self, now: DateTime<Utc>, capabilities: &Capabilities) -> bool {
        if capabilities.manage_entries {
            return true;
        }
        if !capabilities.view {
            return false;
        }
        if self.time_open.is_some_and(|open| now < open) {
            return false;
        }
        if self.time_close.is_some_and(|close| now >= close) {
            return self.view_after_close;
        }
        true
    }

    pub fn rating_factors(&self) -> RatingFactors {
        RatingFactors {
            priority: self.factor_priority,
            heat: self.factor_heat,
            vote: self.factor_vote,
        }
    }

    /// 本轮剩余热度，`None` 表示不限
    pub fn remaining_heat(&self, votes_cast_in_round: usize) -> Option<i32> {
        if self.heat_limit <= 0 {
            return None;
        }
        let used = i32::try_from(votes_cast_in_round).unwrap_or(i32::MAX);
        Some((self.heat_limit - used).max(0))
    }

    /// 活动完成状态，未启用任何完成条件时返回 `None`
    pub fn completion_state(&self, posts: i64, votes: i64) -> Option<CompletionState> {
        if self.completion_post <= 0 && self.completion_vote <= 0 {
            return None;
        }
        let posts_ok = self.completion_post <= 0 || posts >= i64::from(self.completion_post);
        let votes_ok = self.completion_vote <= 0 || votes >= i64::from(self.completion_vote);
        Some(CompletionState {
            complete: posts_ok && votes_ok,
            posts,
            votes,
            required_posts: self.completion_post,
            required_votes: self.completion_vote,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct CompletionState {
    pub complete: bool,
    pub posts: i64,
    pub votes: i64,
    pub required_posts: i32,
    pub required_votes: i32,
}

/// 活动权限，由系统角色与课程角色共同决定
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/hotquestion.ts")]
pub struct Capabilities {
    pub view: bool,
    pub ask: bool,
    pub vote: bool,
    // 审核、删除问题与轮次、导出
    pub manage_entries: bool,
    // 调整优先级、查看评分表
    pub rate: bool,
    // 修改/删除活动实例
    pub manage_activity: bool,
}

impl Capabilities {
    pub fn resolve(system_role: &UserRole, course_role: Option<&CourseUserRole>) -> Self {
        if *system_role == UserRole::Admin {
            return Self::all();
        }
        match course_role {
            Some(CourseUserRole::Teacher) => Self::all(),
            Some(CourseUserRole::Student) => Self {
                view: true,
                ask: true,
                vote: true,
                ..Default::default()
            },
            None => Self::default(),
        }
    }

    fn all() -> Self {
        Self {
            view: true,
            ask: true,
            vote: true,
            manage_entries: true,
            rate: true,
            manage_activity: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(time_open: Option<i64>, time_close: Option<i64>) -> HotQuestion {
        let ts = |t: i64| Utc.timestamp_opt(t, 0).single().expect("valid timestamp");
        HotQuestion {
            id: 1,
            course_id: 1,
            name: "Lecture 1".to_string(),
            intro: None,
            anonymous_post: false,
            require_approval: false,
            heat_limit: 3,
            time_open: time_open.map(ts),
            time_close: time_close.map(ts),
            view_after_close: false,
            labels: HotQuestionLabels::default(),
            grade_max: 10.0,
            factor_priority: 100,
            factor_heat: 100,
            factor_vote: 100,
            completion_post: 0,
            completion_vote: 0,
            created_at: ts(0),
            updated_at: ts(0),
        }
    }

    fn at(t: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(t, 0).single().expect("valid timestamp")
    }

    #[test]
    fn test_open_window() {
        let hq = sample(Some(100), Some(200));
        assert!(!hq.is_open_at(at(99)));
        assert!(hq.is_open_at(at(100)));
        assert!(hq.is_open_at(at(199)));
        assert!(!hq.is_open_at(at(200)));

        let unbounded = sample(None, None);
        assert!(unbounded.is_open_at(at(0)));
    }

    #[test]
    fn test_view_after_close() {
        let student = Capabilities::resolve(&UserRole::User, Some(&CourseUserRole::Student));
        let teacher = Capabilities::resolve(&UserRole::User, Some(&CourseUserRole::Teacher));

        let mut hq = sample(Some(100), Some(200));
        assert!(!hq.is_viewable_at(at(50), &student));
        assert!(hq.is_viewable_at(at(50), &teacher));
        assert!(!hq.is_viewable_at(at(250), &student));

        hq.view_after_close = true;
        assert!(hq.is_viewable_at(at(250), &student));
    }

    #[test]
    fn test_remaining_heat() {
        let mut hq = sample(None, None);
        assert_eq!(hq.remaining_heat(0), Some(3));
        assert_eq!(hq.remaining_heat(2), Some(1));
        assert_eq!(hq.remaining_heat(5), Some(0));

        hq.heat_limit = 0;
        assert_eq!(hq.remaining_heat(100), None);
    }

    #[test]
    fn test_completion_state() {
        let mut hq = sample(None, None);
        assert_eq!(hq.completion_state(5, 5), None);

        hq.completion_post = 2;
        let state = hq.completion_state(1, 0).expect("completion enabled");
        assert!(!state.complete);
        assert!(hq.completion_state(2, 0).expect("completion enabled").complete);

        hq.completion_vote = 3;
        assert!(!hq.completion_state(2, 2).expect("completion enabled").complete);
        assert!(hq.completion_state(2, 3).expect("completion enabled").complete);
    }

    #[test]
    fn test_capabilities_resolve() {
        let outsider = Capabilities::resolve(&UserRole::User, None);
        assert_eq!(outsider, Capabilities::default());

        let student = Capabilities::resolve(&UserRole::Teacher, Some(&CourseUserRole::Student));
        assert!(student.ask && student.vote && student.view);
        assert!(!student.manage_entries && !student.rate);

        let admin = Capabilities::resolve(&UserRole::Admin, None);
        assert!(admin.manage_activity && admin.rate);
    }
}
