//! 活动实例存储操作

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::SeaOrmStorage;
use super::questions::purge_questions;
use crate::entity::calendar_events::{Column as CalendarColumn, Entity as CalendarEvents};
use crate::entity::gradebook_entries::{Column as GradebookColumn, Entity as GradebookEntries};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::hotquestions::{ActiveModel, Column, Entity as HotQuestions};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::entity::rounds::{
    ActiveModel as RoundActiveModel, Column as RoundColumn, Entity as Rounds,
};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    hotquestions::{
        entities::{
            DEFAULT_APPROVAL_LABEL, DEFAULT_HEAT_LABEL, DEFAULT_PRIORITY_LABEL,
            DEFAULT_QUESTION_LABEL, DEFAULT_REMOVE_LABEL, HotQuestion,
        },
        requests::{CreateHotQuestionRequest, UpdateHotQuestionRequest},
    },
    rounds::entities::Round,
};

/// 空白标签回退到默认值
fn label_or_default(label: Option<String>, default: &str) -> String {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// 0 或负数表示不限制
fn optional_time(ts: i64) -> Option<i64> {
    (ts > 0).then_some(ts)
}

impl SeaOrmStorage {
    /// 创建活动并开启第一轮
    pub async fn create_hotquestion_impl(
        &self,
        course_id: i64,
        req: CreateHotQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<(HotQuestion, Round)> {
        let now = now.timestamp();
        let txn = self.db.begin().await?;

        let hotquestion = ActiveModel {
            course_id: Set(course_id),
            name: Set(req.name),
            intro: Set(req.intro),
            anonymous_post: Set(req.anonymous_post),
            require_approval: Set(req.require_approval),
            heat_limit: Set(req.heat_limit.max(0)),
            time_open: Set(optional_time(req.time_open)),
            time_close: Set(optional_time(req.time_close)),
            view_after_close: Set(req.view_after_close),
            question_label: Set(label_or_default(req.question_label, DEFAULT_QUESTION_LABEL)),
            priority_label: Set(label_or_default(req.priority_label, DEFAULT_PRIORITY_LABEL)),
            heat_label: Set(label_or_default(req.heat_label, DEFAULT_HEAT_LABEL)),
            remove_label: Set(label_or_default(req.remove_label, DEFAULT_REMOVE_LABEL)),
            approval_label: Set(label_or_default(req.approval_label, DEFAULT_APPROVAL_LABEL)),
            grade_max: Set(req.grade_max.max(0.0)),
            factor_priority: Set(req.factor_priority),
            factor_heat: Set(req.factor_heat),
            factor_vote: Set(req.factor_vote),
            completion_post: Set(req.completion_post.max(0)),
            completion_vote: Set(req.completion_vote.max(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("创建活动失败: {e}")))?;

        let round = RoundActiveModel {
            hotquestion_id: Set(hotquestion.id),
            start_time: Set(now),
            end_time: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("创建首轮失败: {e}")))?;

        txn.commit().await?;
        Ok((hotquestion.into_hotquestion(), round.into_round()))
    }

    pub async fn get_hotquestion_by_id_impl(&self, id: i64) -> Result<Option<HotQuestion>> {
        let result = HotQuestions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_hotquestion()))
    }

    /// 更新活动配置
    pub async fn update_hotquestion_impl(
        &self,
        id: i64,
        update: UpdateHotQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<HotQuestion>> {
        if self.get_hotquestion_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now.timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(intro) = update.intro {
            model.intro = Set(Some(intro));
        }
        if let Some(anonymous_post) = update.anonymous_post {
            model.anonymous_post = Set(anonymous_post);
        }
        if let Some(require_approval) = update.require_approval {
            model.require_approval = Set(require_approval);
        }
        if let Some(heat_limit) = update.heat_limit {
            model.heat_limit = Set(heat_limit.max(0));
        }
        if let Some(time_open) = update.time_open {
            model.time_open = Set(optional_time(time_open));
        }
        if let Some(time_close) = update.time_close {
            model.time_close = Set(optional_time(time_close));
        }
        if let Some(view_after_close) = update.view_after_close {
            model.view_after_close = Set(view_after_close);
        }
        if update.question_label.is_some() {
            model.question_label = Set(label_or_default(
                update.question_label,
                DEFAULT_QUESTION_LABEL,
            ));
        }
        if update.priority_label.is_some() {
            model.priority_label = Set(label_or_default(
                update.priority_label,
                DEFAULT_PRIORITY_LABEL,
            ));
        }
        if update.heat_label.is_some() {
            model.heat_label = Set(label_or_default(update.heat_label, DEFAULT_HEAT_LABEL));
        }
        if update.remove_label.is_some() {
            model.remove_label = Set(label_or_default(update.remove_label, DEFAULT_REMOVE_LABEL));
        }
        if update.approval_label.is_some() {
            model.approval_label = Set(label_or_default(
                update.approval_label,
                DEFAULT_APPROVAL_LABEL,
            ));
        }
        if let Some(grade_max) = update.grade_max {
            model.grade_max = Set(grade_max.max(0.0));
        }
        if let Some(factor_priority) = update.factor_priority {
            model.factor_priority = Set(factor_priority);
        }
        if let Some(factor_heat) = update.factor_heat {
            model.factor_heat = Set(factor_heat);
        }
        if let Some(factor_vote) = update.factor_vote {
            model.factor_vote = Set(factor_vote);
        }
        if let Some(completion_post) = update.completion_post {
            model.completion_post = Set(completion_post.max(0));
        }
        if let Some(completion_vote) = update.completion_vote {
            model.completion_vote = Set(completion_vote.max(0));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("更新活动失败: {e}")))?;

        self.get_hotquestion_by_id_impl(id).await
    }

    /// 删除活动及其全部数据
    pub async fn delete_hotquestion_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        let question_ids: Vec<i64> = Questions::find()
            .filter(QuestionColumn::HotquestionId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();
        purge_questions(&txn, &question_ids).await?;

        Rounds::delete_many()
            .filter(RoundColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;
        Grades::delete_many()
            .filter(GradeColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;
        GradebookEntries::delete_many()
            .filter(GradebookColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;
        CalendarEvents::delete_many()
            .filter(CalendarColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;

        let result = HotQuestions::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除活动失败: {e}")))?;

        txn.commit().await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn list_course_hotquestions_impl(&self, course_id: i64) -> Result<Vec<HotQuestion>> {
        let items = HotQuestions::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询课程活动失败: {e}")))?;

        Ok(items.into_iter().map(|m| m.into_hotquestion()).collect())
    }

    /// 清空活动数据并开启新一轮
    pub async fn reset_hotquestion_impl(&self, id: i64, now: DateTime<Utc>) -> Result<Round> {
        let txn = self.db.begin().await?;

        let question_ids: Vec<i64> = Questions::find()
            .filter(QuestionColumn::HotquestionId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|q| q.id)
            .collect();
        purge_questions(&txn, &question_ids).await?;

        Rounds::delete_many()
            .filter(RoundColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;
        Grades::delete_many()
            .filter(GradeColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;
        GradebookEntries::delete_many()
            .filter(GradebookColumn::HotquestionId.eq(id))
            .exec(&txn)
            .await?;

        let round = RoundActiveModel {
            hotquestion_id: Set(id),
            start_time: Set(now.timestamp()),
            end_time: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("重置后开启新轮次失败: {e}")))?;

        txn.commit().await?;
        Ok(round.into_round())
    }
}
