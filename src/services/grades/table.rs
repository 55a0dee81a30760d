//! 评分表

use std::cmp::Ordering;

use super::rating::{clamp_grade, tally_users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    courses::entities::CourseUserRole,
    grades::{
        requests::{GradingSortField, GradingTableParams, SortOrder},
        responses::{GradingTableResponse, GradingTableRow},
    },
    users::entities::User,
};
use crate::services::access::load_activity;
use crate::storage::Storage;

fn compare_rows(a: &GradingTableRow, b: &GradingTableRow, field: GradingSortField) -> Ordering {
    match field {
        GradingSortField::Username => a.username.cmp(&b.username),
        GradingSortField::Posts => a.posts.cmp(&b.posts),
        GradingSortField::HeatGiven => a.heat_given.cmp(&b.heat_given),
        GradingSortField::HeatReceived => a.heat_received.cmp(&b.heat_received),
        GradingSortField::RawRating => a.raw_rating.total_cmp(&b.raw_rating),
        GradingSortField::Grade => a
            .grade
            .unwrap_or(f64::MIN)
            .total_cmp(&b.grade.unwrap_or(f64::MIN)),
    }
}

/// 排序评分表，相同值按用户 ID 升序
pub fn sort_rows(rows: &mut [GradingTableRow], field: GradingSortField, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ord = compare_rows(a, b, field);
        let ord = match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        ord.then(a.user_id.cmp(&b.user_id))
    });
}

/// 课程内所有学生的评分表
pub async fn grading_table(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    params: GradingTableParams,
    default_size: i64,
) -> Result<GradingTableResponse> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.rate, "rate")?;
    let hotquestion = access.hotquestion;

    let students = storage
        .list_course_users(hotquestion.course_id, Some(CourseUserRole::Student))
        .await?;
    let student_ids: Vec<i64> = students.iter().map(|s| s.user_id).collect();
    let users = storage.list_users_by_ids(&student_ids).await?;

    let questions = storage.list_hotquestion_questions(hotquestion.id).await?;
    let votes = storage.list_hotquestion_votes(hotquestion.id).await?;
    let tallies = tally_users(&questions, &votes, &hotquestion.rating_factors());

    let mut rows: Vec<GradingTableRow> = users
        .into_iter()
        .map(|u| {
            let tally = tallies.get(&u.id).cloned().unwrap_or_default();
            GradingTableRow {
                user_id: u.id,
                username: u.username,
                display_name: u.display_name,
                posts: tally.posts,
                heat_given: tally.heat_given,
                heat_received: tally.heat_received,
                raw_rating: tally.raw_rating,
                grade: clamp_grade(tally.raw_rating, hotquestion.grade_max),
            }
        })
        .collect();

    sort_rows(&mut rows, params.sort, params.order);

    let pagination = params.pagination(default_size);
    let (page, size) = pagination.normalized();
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(pagination.offset())
        .take(size as usize)
        .collect();

    Ok(GradingTableResponse {
        grade_max: hotquestion.grade_max,
        items,
        pagination: PaginationInfo::new(page, size, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user_id: i64, username: &str, posts: i64, raw_rating: f64) -> GradingTableRow {
        GradingTableRow {
            user_id,
            username: username.to_string(),
            display_name: None,
            posts,
            heat_given: 0,
            heat_received: 0,
            raw_rating,
            grade: Some(raw_rating),
        }
    }

    #[test]
    fn test_sort_by_rating_desc() {
        let mut rows = vec![row(1, "amy", 1, 2.0), row(2, "bob", 3, 5.5), row(3, "cat", 2, 2.0)];
        sort_rows(&mut rows, GradingSortField::RawRating, SortOrder::Desc);
        let ids: Vec<i64> = rows.iter().map(|r| r.user_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_by_username_asc() {
        let mut rows = vec![row(1, "zoe", 1, 0.0), row(2, "adam", 1, 0.0)];
        sort_rows(&mut rows, GradingSortField::Username, SortOrder::Asc);
        assert_eq!(rows[0].username, "adam");
    }

    #[tokio::test]
    async fn test_grading_table_lists_students_only() {
        use crate::models::questions::requests::CreateQuestionRequest;
        use crate::services::questions::create::post_question;
        use crate::services::test_support::{activity, activity_request, at, classroom, storage};

        let storage = storage().await;
        let room = classroom(storage.as_ref(), 3).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Quiz")).await;

        post_question(
            storage.as_ref(),
            &room.students[1],
            hq.id,
            CreateQuestionRequest {
                content: "Why?".to_string(),
                anonymous: false,
            },
            500,
            at(1_100),
        )
        .await
        .expect("post");

        let params = GradingTableParams {
            sort: GradingSortField::Posts,
            order: SortOrder::Desc,
            ..Default::default()
        };
        let table = grading_table(storage.as_ref(), &room.teacher, hq.id, params, 2)
            .await
            .expect("table");

        assert_eq!(table.pagination.total, 3);
        assert_eq!(table.items.len(), 2);
        assert_eq!(table.items[0].username, "student1");
        assert_eq!(table.items[0].posts, 1);

        let err = grading_table(
            storage.as_ref(),
            &room.students[0],
            hq.id,
            GradingTableParams::default(),
            20,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, crate::errors::HotQuestionError::Authorization(_)));

        // 超大页码返回空页
        let params = GradingTableParams {
            page: Some(i64::MAX),
            size: Some(100),
            ..Default::default()
        };
        let table = grading_table(storage.as_ref(), &room.teacher, hq.id, params, 20)
            .await
            .expect("table past the end");
        assert!(table.items.is_empty());
        assert_eq!(table.pagination.total, 3);
        assert_eq!(table.pagination.page, i64::MAX);
    }
}
