//! 评分与成绩册存储操作

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use super::SeaOrmStorage;
use crate::entity::gradebook_entries::{
    ActiveModel as GradebookActiveModel, Column as GradebookColumn, Entity as GradebookEntries,
};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    grades::entities::{Grade, GradebookEntry},
    hotquestions::entities::HotQuestion,
};

impl SeaOrmStorage {
    /// 写入或更新原始评分
    pub async fn upsert_grade_impl(
        &self,
        hotquestion_id: i64,
        user_id: i64,
        raw_rating: f64,
        now: DateTime<Utc>,
    ) -> Result<Grade> {
        let existing = Grades::find()
            .filter(
                Condition::all()
                    .add(Column::HotquestionId.eq(hotquestion_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询评分失败: {e}")))?;

        let model = match existing {
            Some(existing) => {
                let mut active: ActiveModel = existing.into();
                active.raw_rating = Set(raw_rating);
                active.updated_at = Set(now.timestamp());
                active.update(&self.db).await
            }
            None => {
                ActiveModel {
                    hotquestion_id: Set(hotquestion_id),
                    user_id: Set(user_id),
                    raw_rating: Set(raw_rating),
                    updated_at: Set(now.timestamp()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| HotQuestionError::database_operation(format!("保存评分失败: {e}")))?;

        Ok(model.into_grade())
    }

    pub async fn get_grade_impl(&self, hotquestion_id: i64, user_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(
                Condition::all()
                    .add(Column::HotquestionId.eq(hotquestion_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_grades_impl(&self, hotquestion_id: i64) -> Result<Vec<Grade>> {
        let grades = Grades::find()
            .filter(Column::HotquestionId.eq(hotquestion_id))
            .order_by_asc(Column::UserId)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询评分列表失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 推送成绩到成绩册
    pub async fn upsert_gradebook_entry_impl(
        &self,
        hotquestion: &HotQuestion,
        user_id: i64,
        grade: f64,
        now: DateTime<Utc>,
    ) -> Result<GradebookEntry> {
        let existing = GradebookEntries::find()
            .filter(
                Condition::all()
                    .add(GradebookColumn::HotquestionId.eq(hotquestion.id))
                    .add(GradebookColumn::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询成绩册失败: {e}")))?;

        let model = match existing {
            Some(existing) => {
                let mut active: GradebookActiveModel = existing.into();
                active.grade = Set(grade);
                active.grade_max = Set(hotquestion.grade_max);
                active.updated_at = Set(now.timestamp());
                active.update(&self.db).await
            }
            None => {
                GradebookActiveModel {
                    hotquestion_id: Set(hotquestion.id),
                    course_id: Set(hotquestion.course_id),
                    user_id: Set(user_id),
                    grade: Set(grade),
                    grade_max: Set(hotquestion.grade_max),
                    updated_at: Set(now.timestamp()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| HotQuestionError::database_operation(format!("写入成绩册失败: {e}")))?;

        Ok(model.into_gradebook_entry())
    }

    pub async fn get_gradebook_entry_impl(
        &self,
        hotquestion_id: i64,
        user_id: i64,
    ) -> Result<Option<GradebookEntry>> {
        let result = GradebookEntries::find()
            .filter(
                Condition::all()
                    .add(GradebookColumn::HotquestionId.eq(hotquestion_id))
                    .add(GradebookColumn::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询成绩册失败: {e}")))?;

        Ok(result.map(|m| m.into_gradebook_entry()))
    }

    pub async fn delete_gradebook_entries_impl(
        &self,
        hotquestion_id: i64,
        user_id: Option<i64>,
    ) -> Result<u64> {
        let mut cond = Condition::all().add(GradebookColumn::HotquestionId.eq(hotquestion_id));
        if let Some(user_id) = user_id {
            cond = cond.add(GradebookColumn::UserId.eq(user_id));
        }

        let result = GradebookEntries::delete_many()
            .filter(cond)
            .exec(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除成绩册失败: {e}")))?;

        Ok(result.rows_affected)
    }
}
