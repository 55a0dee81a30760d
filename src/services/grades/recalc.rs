//! 增量重新评分

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::rating::{clamp_grade, tally_users};
use crate::errors::Result;
use crate::models::hotquestions::entities::HotQuestion;
use crate::storage::Storage;

/// 重新计算指定用户的评分，并同步成绩册
pub async fn regrade_users(
    storage: &dyn Storage,
    hotquestion: &HotQuestion,
    user_ids: &[i64],
    now: DateTime<Utc>,
) -> Result<()> {
    let users: BTreeSet<i64> = user_ids.iter().copied().collect();
    if users.is_empty() {
        return Ok(());
    }

    let questions = storage.list_hotquestion_questions(hotquestion.id).await?;
    let votes = storage.list_hotquestion_votes(hotquestion.id).await?;
    let tallies = tally_users(&questions, &votes, &hotquestion.rating_factors());

    for user_id in users {
        let raw_rating = tallies.get(&user_id).map(|t| t.raw_rating).unwrap_or(0.0);
        storage
            .upsert_grade(hotquestion.id, user_id, raw_rating, now)
            .await?;

        match clamp_grade(raw_rating, hotquestion.grade_max) {
            Some(grade) => {
                storage
                    .upsert_gradebook_entry(hotquestion, user_id, grade, now)
                    .await?;
            }
            None => {
                storage
                    .delete_gradebook_entries(hotquestion.id, Some(user_id))
                    .await?;
            }
        }
        debug!(
            "Regraded user {} in hotquestion {}: {}",
            user_id, hotquestion.id, raw_rating
        );
    }

    Ok(())
}

/// 重新计算活动内所有有数据的用户
pub async fn regrade_all(
    storage: &dyn Storage,
    hotquestion: &HotQuestion,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut users: BTreeSet<i64> = BTreeSet::new();

    let questions = storage.list_hotquestion_questions(hotquestion.id).await?;
    users.extend(questions.iter().map(|q| q.user_id));

    let votes = storage.list_hotquestion_votes(hotquestion.id).await?;
    users.extend(votes.iter().map(|v| v.voter_id));

    let grades = storage.list_grades(hotquestion.id).await?;
    users.extend(grades.iter().map(|g| g.user_id));

    let users: Vec<i64> = users.into_iter().collect();
    regrade_users(storage, hotquestion, &users, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::requests::CreateQuestionRequest;
    use crate::services::questions::create::post_question;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    #[tokio::test]
    async fn test_regrade_pushes_and_clears_gradebook() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let mut hq = activity(storage.as_ref(), &room, activity_request("Graded")).await;
        let alice = &room.students[0];
        post_question(
            storage.as_ref(),
            alice,
            hq.id,
            CreateQuestionRequest {
                content: "Why is the sky blue?".to_string(),
                anonymous: false,
            },
            100,
            at(1_100),
        )
        .await
        .expect("post");

        regrade_users(storage.as_ref(), &hq, &[alice.id], at(1_200))
            .await
            .expect("regrade");
        let entry = storage
            .get_gradebook_entry(hq.id, alice.id)
            .await
            .expect("entry")
            .expect("entry pushed");
        assert_eq!(entry.grade_max, 10.0);
        assert!((0.0..=10.0).contains(&entry.grade));

        // 满分为 0 时不再推送成绩
        hq.grade_max = 0.0;
        regrade_all(storage.as_ref(), &hq, at(1_300))
            .await
            .expect("regrade all");
        assert!(
            storage
                .get_gradebook_entry(hq.id, alice.id)
                .await
                .expect("entry")
                .is_none()
        );
        assert!(
            storage
                .get_grade(hq.id, alice.id)
                .await
                .expect("grade")
                .is_some()
        );
    }
}
