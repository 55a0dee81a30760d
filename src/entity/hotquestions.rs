//! Hot Question 活动实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "hotquestions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub name: String,
    pub intro: Option<String>,
    pub anonymous_post: bool,
    pub require_approval: bool,
    pub heat_limit: i32,
    pub time_open: Option<i64>,
    pub time_close: Option<i64>,
    pub view_after_close: bool,
    pub question_label: String,
    pub priority_label: String,
    pub heat_label: String,
    pub remove_label: String,
    pub approval_label: String,
    pub grade_max: f64,
    pub factor_priority: i32,
    pub factor_heat: i32,
    pub factor_vote: i32,
    pub completion_post: i32,
    pub completion_vote: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(has_many = "super::rounds::Entity")]
    Rounds,
    #[sea_orm(has_many = "super::questions::Entity")]
    Questions,
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rounds.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Questions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_hotquestion(self) -> crate::models::hotquestions::entities::HotQuestion {
        use crate::models::hotquestions::entities::{HotQuestion, HotQuestionLabels};

        HotQuestion {
            id: self.id,
            course_id: self.course_id,
            name: self.name,
            intro: self.intro,
            anonymous_post: self.anonymous_post,
            require_approval: self.require_approval,
            heat_limit: self.heat_limit,
            // 0 与 NULL 均表示不限制
            time_open: self.time_open.filter(|t| *t > 0).map(super::to_datetime),
            time_close: self.time_close.filter(|t| *t > 0).map(super::to_datetime),
            view_after_close: self.view_after_close,
            labels: HotQuestionLabels {
                question: self.question_label,
                priority: self.priority_label,
                heat: self.heat_label,
                remove: self.remove_label,
                approval: self.approval_label,
            },
            grade_max: self.grade_max,
            factor_priority: self.factor_priority,
            factor_heat: self.factor_heat,
            factor_vote: self.factor_vote,
            completion_post: self.completion_post,
            completion_vote: self.completion_vote,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
