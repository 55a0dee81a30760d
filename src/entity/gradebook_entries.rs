//! 成绩册实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "gradebook_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hotquestion_id: i64,
    pub course_id: i64,
    pub user_id: i64,
    pub grade: f64,
    pub grade_max: f64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hotquestions::Entity",
        from = "Column::HotquestionId",
        to = "super::hotquestions::Column::Id"
    )]
    HotQuestion,
}

impl Related<super::hotquestions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HotQuestion.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_gradebook_entry(self) -> crate::models::grades::entities::GradebookEntry {
        crate::models::grades::entities::GradebookEntry {
            id: self.id,
            hotquestion_id: self.hotquestion_id,
            course_id: self.course_id,
            user_id: self.user_id,
            grade: self.grade,
            grade_max: self.grade_max,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
