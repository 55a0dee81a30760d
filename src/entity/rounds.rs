//! 轮次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hotquestion_rounds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hotquestion_id: i64,
    pub start_time: i64,
    // 0 表示进行中
    pub end_time: i64,
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
    pub fn into_round(self) -> crate::models::rounds::entities::Round {
        crate::models::rounds::entities::Round {
            id: self.id,
            hotquestion_id: self.hotquestion_id,
            start_time: super::to_datetime(self.start_time),
            end_time: (self.end_time != 0).then(|| super::to_datetime(self.end_time)),
        }
    }
}
