use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 提问轮次
///
/// `end_time` 为 `None` 表示轮次仍在进行中。问题是否属于某一轮次
/// 由提问时间决定：`start_time <= time` 且（未结束或 `time < end_time`）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/round.ts")]
pub struct Round {
    pub id: i64,
    pub hotquestion_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl Round {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start_time <= time && self.end_time.is_none_or(|end| time < end)
    }
}

/// 删除轮次的存储层结果
#[derive(Debug)]
pub struct RoundRemoval {
    pub round: Round,
    pub removed_questions: u64,
    // 被删除问题的作者与投票者
    pub affected_users: Vec<i64>,
    pub new_round: Option<Round>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(t: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(t, 0).single().expect("valid timestamp")
    }

    #[test]
    fn test_closed_round_is_half_open_interval() {
        let round = Round {
            id: 1,
            hotquestion_id: 1,
            start_time: at(100),
            end_time: Some(at(200)),
        };
        assert!(!round.is_open());
        assert!(!round.contains(at(99)));
        assert!(round.contains(at(100)));
        assert!(round.contains(at(199)));
        assert!(!round.contains(at(200)));
    }

    #[test]
    fn test_open_round_has_no_upper_bound() {
        let round = Round {
            id: 2,
            hotquestion_id: 1,
            start_time: at(200),
            end_time: None,
        };
        assert!(round.is_open());
        assert!(round.contains(at(200)));
        assert!(round.contains(at(i64::from(i32::MAX))));
    }
}
