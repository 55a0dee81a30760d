//! 用户隐私数据（导出/删除）存储操作

use std::collections::{BTreeSet, HashMap};

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

use super::SeaOrmStorage;
use super::questions::purge_questions;
use crate::entity::comments::{Column as CommentColumn, Entity as Comments};
use crate::entity::gradebook_entries::{Column as GradebookColumn, Entity as GradebookEntries};
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::questions::{Column as QuestionColumn, Entity as Questions};
use crate::entity::votes::{Column as VoteColumn, Entity as Votes};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    comments::entities::Comment,
    privacy::{entities::UserDataDeletion, responses::DeleteUserDataResult},
    questions::entities::Question,
    votes::entities::Vote,
};

/// 问题 ID 到活动 ID 的映射
async fn question_hotquestion_map<C: ConnectionTrait>(
    conn: &C,
    question_ids: &[i64],
) -> Result<HashMap<i64, i64>> {
    if question_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let questions = Questions::find()
        .filter(QuestionColumn::Id.is_in(question_ids.iter().copied()))
        .all(conn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("查询问题失败: {e}")))?;

    Ok(questions
        .into_iter()
        .map(|q| (q.id, q.hotquestion_id))
        .collect())
}

/// 活动内全部问题 ID
async fn hotquestion_question_ids<C: ConnectionTrait>(
    conn: &C,
    hotquestion_id: i64,
) -> Result<Vec<i64>> {
    Ok(Questions::find()
        .filter(QuestionColumn::HotquestionId.eq(hotquestion_id))
        .all(conn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("查询活动问题失败: {e}")))?
        .into_iter()
        .map(|q| q.id)
        .collect())
}

impl SeaOrmStorage {
    /// 用户有数据的活动 ID
    pub async fn list_user_hotquestion_ids_impl(&self, user_id: i64) -> Result<Vec<i64>> {
        let mut ids = BTreeSet::new();

        let questions = Questions::find()
            .filter(QuestionColumn::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询用户问题失败: {e}")))?;
        ids.extend(questions.into_iter().map(|q| q.hotquestion_id));

        let mut question_ids: Vec<i64> = Votes::find()
            .filter(VoteColumn::VoterId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询用户投票失败: {e}")))?
            .into_iter()
            .map(|v| v.question_id)
            .collect();
        question_ids.extend(
            Comments::find()
                .filter(CommentColumn::UserId.eq(user_id))
                .all(&self.db)
                .await
                .map_err(|e| {
                    HotQuestionError::database_operation(format!("查询用户评论失败: {e}"))
                })?
                .into_iter()
                .map(|c| c.question_id),
        );
        ids.extend(
            question_hotquestion_map(&self.db, &question_ids)
                .await?
                .into_values(),
        );

        let grades = Grades::find()
            .filter(GradeColumn::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询用户评分失败: {e}")))?;
        ids.extend(grades.into_iter().map(|g| g.hotquestion_id));

        Ok(ids.into_iter().collect())
    }

    pub async fn list_user_questions_impl(
        &self,
        user_id: i64,
        hotquestion_id: i64,
    ) -> Result<Vec<Question>> {
        let questions = Questions::find()
            .filter(
                Condition::all()
                    .add(QuestionColumn::UserId.eq(user_id))
                    .add(QuestionColumn::HotquestionId.eq(hotquestion_id)),
            )
            .order_by_asc(QuestionColumn::Time)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询用户问题失败: {e}")))?;

        Ok(questions.into_iter().map(|m| m.into_question()).collect())
    }

    pub async fn list_user_votes_impl(&self, user_id: i64, hotquestion_id: i64) -> Result<Vec<Vote>> {
        let question_ids = hotquestion_question_ids(&self.db, hotquestion_id).await?;
        if question_ids.is_empty() {
            return Ok(vec![]);
        }

        let votes = Votes::find()
            .filter(
                Condition::all()
                    .add(VoteColumn::VoterId.eq(user_id))
                    .add(VoteColumn::QuestionId.is_in(question_ids)),
            )
            .order_by_asc(VoteColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询用户投票失败: {e}")))?;

        Ok(votes.into_iter().map(|m| m.into_vote()).collect())
    }

    pub async fn list_user_comments_impl(
        &self,
        user_id: i64,
        hotquestion_id: i64,
    ) -> Result<Vec<Comment>> {
        let question_ids = hotquestion_question_ids(&self.db, hotquestion_id).await?;
        if question_ids.is_empty() {
            return Ok(vec![]);
        }

        let comments = Comments::find()
            .filter(
                Condition::all()
                    .add(CommentColumn::UserId.eq(user_id))
                    .add(CommentColumn::QuestionId.is_in(question_ids)),
            )
            .order_by_asc(CommentColumn::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询用户评论失败: {e}")))?;

        Ok(comments.into_iter().map(|m| m.into_comment()).collect())
    }

    /// 删除用户数据，`hotquestion_id` 为 None 时删除全部活动中的数据
    pub async fn delete_user_data_impl(
        &self,
        user_id: i64,
        hotquestion_id: Option<i64>,
    ) -> Result<UserDataDeletion> {
        let txn = self.db.begin().await?;
        let mut result = DeleteUserDataResult::default();
        let mut affected = BTreeSet::new();

        let scope = match hotquestion_id {
            Some(id) => Some(hotquestion_question_ids(&txn, id).await?),
            None => None,
        };

        // 用户的问题：其投票者需要重新评分
        let mut own_questions = Questions::find().filter(QuestionColumn::UserId.eq(user_id));
        if let Some(id) = hotquestion_id {
            own_questions = own_questions.filter(QuestionColumn::HotquestionId.eq(id));
        }
        let own_questions = own_questions.all(&txn).await?;
        let own_ids: Vec<i64> = own_questions.iter().map(|q| q.id).collect();
        let own_map: HashMap<i64, i64> = own_questions
            .iter()
            .map(|q| (q.id, q.hotquestion_id))
            .collect();

        if !own_ids.is_empty() {
            let votes_on_own = Votes::find()
                .filter(VoteColumn::QuestionId.is_in(own_ids.iter().copied()))
                .all(&txn)
                .await?;
            for vote in votes_on_own {
                if vote.voter_id != user_id
                    && let Some(hq) = own_map.get(&vote.question_id)
                {
                    affected.insert((*hq, vote.voter_id));
                }
            }
        }
        result.questions = purge_questions(&txn, &own_ids).await?;

        // 用户投出的票：被投问题的作者需要重新评分
        let mut votes_cond = Condition::all().add(VoteColumn::VoterId.eq(user_id));
        if let Some(ids) = &scope {
            votes_cond = votes_cond.add(VoteColumn::QuestionId.is_in(ids.iter().copied()));
        }
        let own_votes = Votes::find().filter(votes_cond.clone()).all(&txn).await?;
        let voted_ids: Vec<i64> = own_votes.iter().map(|v| v.question_id).collect();
        let voted_questions = Questions::find()
            .filter(QuestionColumn::Id.is_in(voted_ids))
            .all(&txn)
            .await?;
        for question in voted_questions {
            if question.user_id != user_id {
                affected.insert((question.hotquestion_id, question.user_id));
            }
        }
        result.votes = Votes::delete_many()
            .filter(votes_cond)
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除用户投票失败: {e}")))?
            .rows_affected;

        let mut comments_cond = Condition::all().add(CommentColumn::UserId.eq(user_id));
        if let Some(ids) = &scope {
            comments_cond = comments_cond.add(CommentColumn::QuestionId.is_in(ids.iter().copied()));
        }
        result.comments = Comments::delete_many()
            .filter(comments_cond)
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除用户评论失败: {e}")))?
            .rows_affected;

        let mut grades_cond = Condition::all().add(GradeColumn::UserId.eq(user_id));
        let mut gradebook_cond = Condition::all().add(GradebookColumn::UserId.eq(user_id));
        if let Some(id) = hotquestion_id {
            grades_cond = grades_cond.add(GradeColumn::HotquestionId.eq(id));
            gradebook_cond = gradebook_cond.add(GradebookColumn::HotquestionId.eq(id));
        }
        result.grades = Grades::delete_many()
            .filter(grades_cond)
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除用户评分失败: {e}")))?
            .rows_affected;
        GradebookEntries::delete_many()
            .filter(gradebook_cond)
            .exec(&txn)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除用户成绩册失败: {e}")))?;

        txn.commit().await?;

        Ok(UserDataDeletion {
            result,
            affected: affected.into_iter().collect(),
        })
    }
}
