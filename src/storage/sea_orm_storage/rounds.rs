//! 轮次存储操作

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

use super::SeaOrmStorage;
use super::questions::{purge_questions, round_condition};
use crate::entity::questions::Entity as Questions;
use crate::entity::rounds::{ActiveModel, Column, Entity as Rounds};
use crate::entity::votes::{Column as VoteColumn, Entity as Votes};
use crate::errors::{HotQuestionError, Result};
use crate::models::rounds::entities::{Round, RoundRemoval};

impl SeaOrmStorage {
    /// 按开始时间顺序列出轮次
    pub async fn list_rounds_impl(&self, hotquestion_id: i64) -> Result<Vec<Round>> {
        let rounds = Rounds::find()
            .filter(Column::HotquestionId.eq(hotquestion_id))
            .order_by_asc(Column::StartTime)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询轮次列表失败: {e}")))?;

        Ok(rounds.into_iter().map(|m| m.into_round()).collect())
    }

    pub async fn get_round_by_id_impl(&self, round_id: i64) -> Result<Option<Round>> {
        let result = Rounds::find_by_id(round_id)
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询轮次失败: {e}")))?;

        Ok(result.map(|m| m.into_round()))
    }

    /// 当前进行中的轮次
    pub async fn get_current_round_impl(&self, hotquestion_id: i64) -> Result<Option<Round>> {
        let result = Rounds::find()
            .filter(
                Condition::all()
                    .add(Column::HotquestionId.eq(hotquestion_id))
                    .add(Column::EndTime.eq(0)),
            )
            .order_by_desc(Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询当前轮次失败: {e}")))?;

        Ok(result.map(|m| m.into_round()))
    }

    /// 结束当前轮次并开启新一轮
    pub async fn start_new_round_impl(
        &self,
        hotquestion_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Round> {
        let now = now.timestamp();
        let txn = self.db.begin().await?;

        Rounds::update_many()
            .col_expr(Column::EndTime, Expr::value(now))
            .filter(
                Condition::all()
                    .add(Column::HotquestionId.eq(hotquestion_id))
                    .add(Column::EndTime.eq(0)),
            )
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("结束当前轮次失败: {e}")))?;

        let round = ActiveModel {
            hotquestion_id: Set(hotquestion_id),
            start_time: Set(now),
            end_time: Set(0),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("开启新轮次失败: {e}")))?;

        txn.commit().await?;
        Ok(round.into_round())
    }

    /// 删除轮次及其问题；删除的是当前轮次时立即开启新一轮
    pub async fn remove_round_impl(
        &self,
        round_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<RoundRemoval>> {
        let txn = self.db.begin().await?;

        let Some(model) = Rounds::find_by_id(round_id).one(&txn).await? else {
            return Ok(None);
        };
        let round = model.into_round();

        let questions = Questions::find()
            .filter(round_condition(&round))
            .all(&txn)
            .await?;
        let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

        let mut affected_users: Vec<i64> = questions.iter().map(|q| q.user_id).collect();
        if !question_ids.is_empty() {
            let voters = Votes::find()
                .filter(VoteColumn::QuestionId.is_in(question_ids.iter().copied()))
                .all(&txn)
                .await?;
            affected_users.extend(voters.into_iter().map(|v| v.voter_id));
        }
        affected_users.sort_unstable();
        affected_users.dedup();

        purge_questions(&txn, &question_ids).await?;

        Rounds::delete_by_id(round_id)
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除轮次失败: {e}")))?;

        let new_round = if round.is_open() {
            let created = ActiveModel {
                hotquestion_id: Set(round.hotquestion_id),
                start_time: Set(now.timestamp()),
                end_time: Set(0),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("开启新轮次失败: {e}")))?;
            Some(created.into_round())
        } else {
            None
        };

        txn.commit().await?;

        Ok(Some(RoundRemoval {
            round,
            removed_questions: question_ids.len() as u64,
            affected_users,
            new_round,
        }))
    }
}
