use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use super::SeaOrmStorage;
use crate::entity::comments::{ActiveModel, Column, Entity as Comments};
use crate::errors::{HotQuestionError, Result};
use crate::models::comments::entities::Comment;

impl SeaOrmStorage {
    pub async fn create_comment_impl(
        &self,
        question_id: i64,
        user_id: i64,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        let model = ActiveModel {
            question_id: Set(question_id),
            user_id: Set(user_id),
            content: Set(content),
            created_at: Set(now.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("创建评论失败: {e}")))?;

        Ok(result.into_comment())
    }

    pub async fn get_comment_by_id_impl(&self, id: i64) -> Result<Option<Comment>> {
        let result = Comments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询评论失败: {e}")))?;

        Ok(result.map(|m| m.into_comment()))
    }

    pub async fn list_comments_impl(&self, question_id: i64) -> Result<Vec<Comment>> {
        let comments = Comments::find()
            .filter(Column::QuestionId.eq(question_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询评论列表失败: {e}")))?;

        Ok(comments.into_iter().map(|m| m.into_comment()).collect())
    }

    pub async fn delete_comment_impl(&self, id: i64) -> Result<bool> {
        let result = Comments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除评论失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
