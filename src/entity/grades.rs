//! 活动评分缓存实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hotquestion_grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hotquestion_id: i64,
    pub user_id: i64,
    pub raw_rating: f64,
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
    pub fn into_grade(self) -> crate::models::grades::entities::Grade {
        crate::models::grades::entities::Grade {
            id: self.id,
            hotquestion_id: self.hotquestion_id,
            user_id: self.user_id,
            raw_rating: self.raw_rating,
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
