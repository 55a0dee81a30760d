//! 日历事件存储操作

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

use super::SeaOrmStorage;
use crate::entity::calendar_events::{ActiveModel, Column, Entity as CalendarEvents};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    calendar::entities::{CalendarEvent, CalendarEventType},
    hotquestions::entities::HotQuestion,
};

impl SeaOrmStorage {
    /// 每个活动每种事件至多一条
    pub async fn upsert_calendar_event_impl(
        &self,
        hotquestion: &HotQuestion,
        event_type: CalendarEventType,
        name: String,
        time_start: DateTime<Utc>,
    ) -> Result<CalendarEvent> {
        let existing = CalendarEvents::find()
            .filter(
                Condition::all()
                    .add(Column::HotquestionId.eq(hotquestion.id))
                    .add(Column::EventType.eq(event_type.to_string())),
            )
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询日历事件失败: {e}")))?;

        let model = match existing {
            Some(existing) => {
                let mut active: ActiveModel = existing.into();
                active.name = Set(name);
                active.time_start = Set(time_start.timestamp());
                active.update(&self.db).await
            }
            None => {
                ActiveModel {
                    hotquestion_id: Set(hotquestion.id),
                    course_id: Set(hotquestion.course_id),
                    event_type: Set(event_type.to_string()),
                    name: Set(name),
                    time_start: Set(time_start.timestamp()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| HotQuestionError::database_operation(format!("保存日历事件失败: {e}")))?;

        Ok(model.into_calendar_event())
    }

    pub async fn delete_calendar_event_impl(
        &self,
        hotquestion_id: i64,
        event_type: CalendarEventType,
    ) -> Result<bool> {
        let result = CalendarEvents::delete_many()
            .filter(
                Condition::all()
                    .add(Column::HotquestionId.eq(hotquestion_id))
                    .add(Column::EventType.eq(event_type.to_string())),
            )
            .exec(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("删除日历事件失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn list_calendar_events_impl(&self, hotquestion_id: i64) -> Result<Vec<CalendarEvent>> {
        let events = CalendarEvents::find()
            .filter(Column::HotquestionId.eq(hotquestion_id))
            .order_by_asc(Column::TimeStart)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询日历事件失败: {e}")))?;

        Ok(events.into_iter().map(|m| m.into_calendar_event()).collect())
    }
}
