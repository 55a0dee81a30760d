//! 投票（热度）存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

use super::SeaOrmStorage;
use super::questions::round_condition;
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::entity::votes::{ActiveModel, Column, Entity as Votes};
use crate::errors::{HotQuestionError, Result};
use crate::models::{rounds::entities::Round, votes::entities::Vote};

impl SeaOrmStorage {
    /// 切换投票：已投则撤销，未投则投出
    pub async fn toggle_vote_impl(&self, question_id: i64, voter_id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        let existing = Votes::find()
            .filter(
                Condition::all()
                    .add(Column::QuestionId.eq(question_id))
                    .add(Column::VoterId.eq(voter_id)),
            )
            .one(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询投票失败: {e}")))?;

        let voted = match existing {
            Some(vote) => {
                Votes::delete_by_id(vote.id)
                    .exec(&txn)
                    .await
                    .map_err(|e| {
                        HotQuestionError::database_operation(format!("撤销投票失败: {e}"))
                    })?;
                false
            }
            None => {
                ActiveModel {
                    question_id: Set(question_id),
                    voter_id: Set(voter_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| HotQuestionError::database_operation(format!("投票失败: {e}")))?;
                true
            }
        };

        txn.commit().await?;
        Ok(voted)
    }

    pub async fn list_votes_for_questions_impl(&self, question_ids: &[i64]) -> Result<Vec<Vote>> {
        if question_ids.is_empty() {
            return Ok(vec![]);
        }

        let votes = Votes::find()
            .filter(Column::QuestionId.is_in(question_ids.iter().copied()))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询投票失败: {e}")))?;

        Ok(votes.into_iter().map(|m| m.into_vote()).collect())
    }

    /// 活动内全部投票
    pub async fn list_hotquestion_votes_impl(&self, hotquestion_id: i64) -> Result<Vec<Vote>> {
        let question_ids: Vec<i64> = Questions::find()
            .filter(QuestionColumn::HotquestionId.eq(hotquestion_id))
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询活动问题失败: {e}")))?
            .into_iter()
            .map(|q| q.id)
            .collect();

        self.list_votes_for_questions_impl(&question_ids).await
    }

    /// 用户在某轮次中投出的票数
    pub async fn count_round_votes_by_user_impl(&self, round: &Round, voter_id: i64) -> Result<i64> {
        let question_ids: Vec<i64> = Questions::find()
            .filter(round_condition(round))
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询轮次问题失败: {e}")))?
            .into_iter()
            .map(|q| q.id)
            .collect();

        if question_ids.is_empty() {
            return Ok(0);
        }

        let count = Votes::find()
            .filter(
                Condition::all()
                    .add(Column::VoterId.eq(voter_id))
                    .add(Column::QuestionId.is_in(question_ids)),
            )
            .count(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("统计投票数量失败: {e}")))?;

        Ok(count as i64)
    }
}
