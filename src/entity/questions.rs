//! 问题实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hotquestion_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hotquestion_id: i64,
    pub user_id: i64,
    pub content: String,
    pub time: i64,
    pub anonymous: bool,
    pub approved: bool,
    pub tpriority: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hotquestions::Entity",
        from = "Column::HotquestionId",
        to = "super::hotquestions::Column::Id"
    )]
    HotQuestion,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::votes::Entity")]
    Votes,
    #[sea_orm(has_many = "super::comments::Entity")]
    Comments,
}

impl Related<super::hotquestions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HotQuestion.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl Related<super::comments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(self) -> crate::models::questions::entities::Question {
        crate::models::questions::entities::Question {
            id: self.id,
            hotquestion_id: self.hotquestion_id,
            user_id: self.user_id,
            content: self.content,
            time: super::to_datetime(self.time),
            anonymous: self.anonymous,
            approved: self.approved,
            tpriority: self.tpriority,
        }
    }
}
