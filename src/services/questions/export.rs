//! 问题 CSV 导出

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::{QuestionService, select_round};
use crate::config::AppConfig;
use crate::errors::{HotQuestionError, Result};
use crate::models::{ErrorCode, rounds::requests::RoundQuery, users::entities::User};
use crate::services::grades::rating::heat_counts;
use crate::services::{access::load_activity, current_user, error_response, error_response_with};
use crate::storage::Storage;

/// 导出结果：文件名与 CSV 内容
pub struct QuestionExport {
    pub filename: String,
    pub data: Vec<u8>,
}

/// 导出某一轮次的问题，缺省为当前轮次；匿名问题不导出作者
pub async fn export_csv(
    storage: &dyn Storage,
    user: &User,
    hotquestion_id: i64,
    round_id: Option<i64>,
    max_rows: u64,
) -> Result<QuestionExport> {
    let access = load_activity(storage, user, hotquestion_id).await?;
    access.require(access.capabilities.manage_entries, "manage_entries")?;

    let rounds = storage.list_rounds(hotquestion_id).await?;
    let (_, round) = select_round(&rounds, round_id)?;

    let mut questions = storage.list_round_questions(round).await?;
    questions.sort_by(|a, b| a.time.cmp(&b.time).then(a.id.cmp(&b.id)));
    questions.truncate(usize::try_from(max_rows).unwrap_or(usize::MAX));

    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
    let votes = storage.list_votes_for_questions(&question_ids).await?;
    let heat = heat_counts(&questions, &votes);

    let author_ids: Vec<i64> = questions.iter().map(|q| q.user_id).collect();
    let users: HashMap<i64, User> = storage
        .list_users_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let labels = &access.hotquestion.labels;
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "id",
        "time",
        "author",
        labels.question.as_str(),
        "anonymous",
        labels.approval.as_str(),
        labels.priority.as_str(),
        labels.heat.as_str(),
    ])?;

    for question in &questions {
        let author = if question.anonymous {
            String::new()
        } else {
            users
                .get(&question.user_id)
                .map(|u| u.username.clone())
                .unwrap_or_default()
        };
        wtr.write_record([
            question.id.to_string(),
            question.time.to_rfc3339(),
            author,
            question.content.clone(),
            question.anonymous.to_string(),
            question.approved.to_string(),
            question.tpriority.to_string(),
            heat.get(&question.id).copied().unwrap_or(0).to_string(),
        ])?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| HotQuestionError::serialization(format!("CSV 生成失败: {e}")))?;

    Ok(QuestionExport {
        filename: format!("hotquestion-{}-round-{}.csv", hotquestion_id, round.id),
        data,
    })
}

pub async fn export_questions(
    service: &QuestionService,
    request: &HttpRequest,
    hotquestion_id: i64,
    query: RoundQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let user = match current_user(request) {
        Ok(user) => user,
        Err(e) => return Ok(error_response(&e)),
    };
    let max_rows = AppConfig::get().hotquestion.export_max_rows;

    match export_csv(storage.as_ref(), &user, hotquestion_id, query.round_id, max_rows).await {
        Ok(export) => Ok(HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", export.filename),
            ))
            .body(export.data)),
        Err(e @ HotQuestionError::Serialization(_)) => {
            error!("导出问题失败: {}", e);
            Ok(error_response_with(ErrorCode::ExportFailed, &e))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questions::requests::CreateQuestionRequest;
    use crate::services::questions::create::post_question;
    use crate::services::test_support::{activity, activity_request, at, classroom, storage};

    #[tokio::test]
    async fn test_export_hides_anonymous_authors() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 2).await;
        let hq = activity(storage.as_ref(), &room, activity_request("Lecture")).await;

        post_question(
            storage.as_ref(),
            &room.students[0],
            hq.id,
            CreateQuestionRequest {
                content: "Named, with a comma".to_string(),
                anonymous: false,
            },
            100,
            at(1_100),
        )
        .await
        .expect("post");
        post_question(
            storage.as_ref(),
            &room.students[1],
            hq.id,
            CreateQuestionRequest {
                content: "Secret".to_string(),
                anonymous: true,
            },
            100,
            at(1_200),
        )
        .await
        .expect("post");

        let export = export_csv(storage.as_ref(), &room.teacher, hq.id, None, 100)
            .await
            .expect("export");
        let text = String::from_utf8(export.data).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,time,author,Question,anonymous,Approved,Priority,Heat");
        assert!(lines[1].contains("student0"));
        assert!(lines[1].contains("\"Named, with a comma\""));
        assert!(!lines[2].contains("student1"));

        let capped = export_csv(storage.as_ref(), &room.teacher, hq.id, None, 1)
            .await
            .expect("export");
        let text = String::from_utf8(capped.data).expect("utf8");
        assert_eq!(text.lines().count(), 2);

        let denied = export_csv(storage.as_ref(), &room.students[0], hq.id, None, 100).await;
        assert!(matches!(denied, Err(HotQuestionError::Authorization(_))));
    }
}
