use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub enum CalendarEventType {
    Open,
    Close,
}

impl<'de> Deserialize<'de> for CalendarEventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<CalendarEventType>()
            .map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for CalendarEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CalendarEventType::Open => write!(f, "open"),
            CalendarEventType::Close => write!(f, "close"),
        }
    }
}

impl std::str::FromStr for CalendarEventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(CalendarEventType::Open),
            "close" => Ok(CalendarEventType::Close),
            _ => Err(format!("Invalid calendar event type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/calendar.ts")]
pub struct CalendarEvent {
    pub id: i64,
    pub hotquestion_id: i64,
    pub course_id: i64,
    pub event_type: CalendarEventType,
    pub name: String,
    pub time_start: DateTime<Utc>,
}
