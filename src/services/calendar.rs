//! 活动日历事件同步

use tracing::debug;

use crate::errors::Result;
use crate::models::{
    calendar::entities::{CalendarEvent, CalendarEventType},
    hotquestions::entities::HotQuestion,
    users::entities::User,
};
use crate::services::access::load_activity;
use crate::storage::Storage;

pub fn event_name(hotquestion: &HotQuestion, event_type: CalendarEventType) -> String {
    match event_type {
        CalendarEventType::Open => format!("{} opens", hotquestion.name),
        CalendarEventType::Close => format!("{} closes", hotquestion.name),
    }
}

/// 按开放/关闭时间创建、移动或删除日历事件
pub async fn sync_calendar(storage: &dyn Storage, hotquestion: &HotQuestion) -> Result<()> {
    let slots = [
        (CalendarEventType::Open, hotquestion.time_open),
        (CalendarEventType::Close, hotquestion.time_close),
    ];

    for (event_type, time) in slots {
        match time {
            Some(time) => {
                let name = event_name(hotquestion, event_type);
                storage
                    .upsert_calendar_event(hotquestion, event_type, name, time)
                    .await?;
            }
            None => {
                if storage
                    .delete_calendar_event(hotquestion.id, event_type)
                    .await?
                {
                    debug!(
                        "Removed {} calendar event of hotquestion {}",
                        event_type, hotquestion.id
                    );
                }
            }
        }
    }

    Ok(())
}

pub async fn list_events(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
) -> Result<Vec<CalendarEvent>> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.view, "view")?;
    storage.list_calendar_events(hotquestion_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::hotquestions::requests::UpdateHotQuestionRequest;
    use crate::services::hotquestions::update::update_instance;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    #[tokio::test]
    async fn test_calendar_follows_time_window() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut req = activity_request("Week 1");
        req.time_open = 2_000;
        req.time_close = 5_000;
        let hq = activity(storage.as_ref(), &room, req).await;

        let events = list_events(storage.as_ref(), &room.students[0], hq.id)
            .await
            .expect("list events");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, CalendarEventType::Open);
        assert_eq!(events[0].name, "Week 1 opens");
        assert_eq!(events[1].time_start, at(5_000));

        let update = UpdateHotQuestionRequest {
            time_close: Some(0),
            time_open: Some(3_000),
            ..Default::default()
        };
        update_instance(storage.as_ref(), &room.teacher, hq.id, update, at(1_500))
            .await
            .expect("update activity");

        let events = storage.list_calendar_events(hq.id).await.expect("list");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].time_start, at(3_000));
    }
}
