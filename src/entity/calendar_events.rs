//! 日历事件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "calendar_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub hotquestion_id: i64,
    pub course_id: i64,
    pub event_type: String,
    pub name: String,
    pub time_start: i64,
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
    pub fn into_calendar_event(self) -> crate::models::calendar::entities::CalendarEvent {
        use crate::models::calendar::entities::{CalendarEvent, CalendarEventType};

        CalendarEvent {
            id: self.id,
            hotquestion_id: self.hotquestion_id,
            course_id: self.course_id,
            event_type: self
                .event_type
                .parse::<CalendarEventType>()
                .unwrap_or(CalendarEventType::Open),
            name: self.name,
            time_start: super::to_datetime(self.time_start),
        }
    }
}
