//! 问题存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait, sea_query::Expr,
};

use super::SeaOrmStorage;
use crate::entity::comments::{Column as CommentColumn, Entity as Comments};
use crate::entity::questions::{ActiveModel, Column, Entity as Questions};
use crate::entity::votes::{Column as VoteColumn, Entity as Votes};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    questions::entities::{NewQuestion, Question},
    rounds::entities::Round,
};

/// 属于某轮次的问题：`start <= time`，且轮次未结束或 `time < end`
pub(super) fn round_condition(round: &Round) -> Condition {
    let mut cond = Condition::all()
        .add(Column::HotquestionId.eq(round.hotquestion_id))
        .add(Column::Time.gte(round.start_time.timestamp()));
    if let Some(end) = round.end_time {
        cond = cond.add(Column::Time.lt(end.timestamp()));
    }
    cond
}

/// 删除问题及其投票与评论
pub(super) async fn purge_questions<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    Votes::delete_many()
        .filter(VoteColumn::QuestionId.is_in(ids.iter().copied()))
        .exec(conn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("删除问题投票失败: {e}")))?;

    Comments::delete_many()
        .filter(CommentColumn::QuestionId.is_in(ids.iter().copied()))
        .exec(conn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("删除问题评论失败: {e}")))?;

    let result = Questions::delete_many()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("删除问题失败: {e}")))?;

    Ok(result.rows_affected)
}

impl SeaOrmStorage {
    pub async fn create_question_impl(&self, question: NewQuestion) -> Result<Question> {
        let model = ActiveModel {
            hotquestion_id: Set(question.hotquestion_id),
            user_id: Set(question.user_id),
            content: Set(question.content),
            time: Set(question.time.timestamp()),
            anonymous: Set(question.anonymous),
            approved: Set(question.approved),
            tpriority: Set(0),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("创建问题失败: {e}")))?;

        Ok(result.into_question())
    }

    pub async fn get_question_by_id_impl(&self, id: i64) -> Result<Option<Question>> {
        let result = Questions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询问题失败: {e}")))?;

        Ok(result.map(|m| m.into_question()))
    }

    /// 某轮次内的问题，按时间倒序
    pub async fn list_round_questions_impl(&self, round: &Round) -> Result<Vec<Question>> {
        let questions = Questions::find()
            .filter(round_condition(round))
            .order_by_desc(Column::Time)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询轮次问题失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn list_hotquestion_questions_impl(
        &self,
        hotquestion_id: i64,
    ) -> Result<Vec<Question>> {
        let questions = Questions::find()
            .filter(Column::HotquestionId.eq(hotquestion_id))
            .order_by_asc(Column::Time)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询活动问题失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn count_questions_impl(
        &self,
        hotquestion_id: i64,
        user_id: Option<i64>,
    ) -> Result<i64> {
        let mut select = Questions::find().filter(Column::HotquestionId.eq(hotquestion_id));
        if let Some(user_id) = user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        let count = select
            .count(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("统计问题数量失败: {e}")))?;

        Ok(count as i64)
    }

    pub async fn set_question_approved_impl(
        &self,
        id: i64,
        approved: bool,
    ) -> Result<Option<Question>> {
        let result = Questions::update_many()
            .col_expr(Column::Approved, Expr::value(approved))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("更新审核状态失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_question_by_id_impl(id).await
    }

    /// 调整教师优先级
    pub async fn adjust_question_priority_impl(
        &self,
        id: i64,
        delta: i32,
    ) -> Result<Option<Question>> {
        let txn = self.db.begin().await?;

        let Some(model) = Questions::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let tpriority = model.tpriority.saturating_add(delta);
        let mut active: ActiveModel = model.into();
        active.tpriority = Set(tpriority);
        let updated = active
            .update(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("调整优先级失败: {e}")))?;

        txn.commit().await?;
        Ok(Some(updated.into_question()))
    }

    /// 删除问题，返回原问题与其投票者
    pub async fn delete_question_impl(&self, id: i64) -> Result<Option<(Question, Vec<i64>)>> {
        let txn = self.db.begin().await?;

        let Some(model) = Questions::find_by_id(id).one(&txn).await? else {
            return Ok(None);
        };

        let voters: Vec<i64> = Votes::find()
            .filter(VoteColumn::QuestionId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|v| v.voter_id)
            .collect();

        purge_questions(&txn, &[id]).await?;
        txn.commit().await?;

        Ok(Some((model.into_question(), voters)))
    }
}
