//! 活动访问控制
//!
//! 权限由系统角色与课程角色共同决定，见 `Capabilities::resolve`。

use chrono::{DateTime, Utc};

use crate::errors::{HotQuestionError, Result};
use crate::models::{
    courses::entities::CourseUserRole,
    hotquestions::entities::{Capabilities, HotQuestion},
    users::entities::User,
};
use crate::storage::Storage;

/// 已加载的活动及当前用户权限
#[derive(Debug, Clone)]
pub struct ActivityAccess {
    pub hotquestion: HotQuestion,
    pub capabilities: Capabilities,
}

impl ActivityAccess {
    pub fn require(&self, allowed: bool, action: &str) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(HotQuestionError::authorization(format!(
                "没有权限执行该操作: {action}"
            )))
        }
    }

    /// 查看问题列表需要 view 权限且活动处于可查看时段
    pub fn require_view(&self, now: DateTime<Utc>) -> Result<()> {
        self.require(self.capabilities.view, "view")?;
        if !self.hotquestion.is_viewable_at(now, &self.capabilities) {
            return Err(HotQuestionError::activity_closed("活动当前不可查看"));
        }
        Ok(())
    }

    /// 提问或投票需要活动处于开放时段
    pub fn require_open(&self, now: DateTime<Utc>) -> Result<()> {
        if !self.hotquestion.is_open_at(now) {
            return Err(HotQuestionError::activity_closed("活动未开放"));
        }
        Ok(())
    }
}

/// 用户在课程中的角色
pub async fn course_role(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> Result<Option<CourseUserRole>> {
    Ok(storage
        .get_course_user(course_id, user.id)
        .await?
        .map(|member| member.role))
}

pub async fn resolve_capabilities(
    storage: &dyn Storage,
    user: &User,
    course_id: i64,
) -> Result<Capabilities> {
    let role = course_role(storage, user, course_id).await?;
    Ok(Capabilities::resolve(&user.role, role.as_ref()))
}

/// 加载活动并解析当前用户权限
pub async fn load_activity(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
) -> Result<ActivityAccess> {
    let hotquestion = storage
        .get_hotquestion_by_id(hotquestion_id)
        .await?
        .ok_or_else(|| HotQuestionError::not_found(format!("活动不存在: {hotquestion_id}")))?;

    let capabilities = resolve_capabilities(storage, user, hotquestion.course_id).await?;

    Ok(ActivityAccess {
        hotquestion,
        capabilities,
    })
}
