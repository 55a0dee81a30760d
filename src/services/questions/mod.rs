pub mod create;
pub mod export;
pub mod manage;
pub mod view;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{HotQuestionError, Result};
use crate::models::{
    questions::{
        entities::{PriorityDirection, Question},
        requests::CreateQuestionRequest,
    },
    rounds::{entities::Round, requests::RoundQuery},
};
use crate::storage::Storage;

/// 加载属于指定活动的问题
pub(crate) async fn load_question(
    storage: &dyn Storage,
    hotquestion_id: i64,
    question_id: i64,
) -> Result<Question> {
    storage
        .get_question_by_id(question_id)
        .await?
        .filter(|q| q.hotquestion_id == hotquestion_id)
        .ok_or_else(|| HotQuestionError::not_found(format!("问题不存在: {question_id}")))
}

/// 选出指定轮次（缺省为进行中的轮次）及其在列表中的位置
pub(crate) fn select_round(rounds: &[Round], round_id: Option<i64>) -> Result<(usize, &Round)> {
    let found = match round_id {
        Some(id) => rounds.iter().enumerate().find(|(_, r)| r.id == id),
        None => rounds.iter().enumerate().rev().find(|(_, r)| r.is_open()),
    };
    found.ok_or_else(|| match round_id {
        Some(id) => HotQuestionError::not_found(format!("轮次不存在: {id}")),
        None => HotQuestionError::not_found("活动没有进行中的轮次"),
    })
}

pub struct QuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuestionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 查看轮次问题
    pub async fn view_round(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        query: RoundQuery,
    ) -> ActixResult<HttpResponse> {
        view::get_round_view(self, request, hotquestion_id, query).await
    }

    pub async fn create_question(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        req: CreateQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_question(self, request, hotquestion_id, req).await
    }

    pub async fn delete_question(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::delete_question(self, request, hotquestion_id, question_id).await
    }

    // 切换审核状态
    pub async fn approve_question(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        manage::approve_question(self, request, hotquestion_id, question_id).await
    }

    pub async fn prioritize_question(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
        direction: PriorityDirection,
    ) -> ActixResult<HttpResponse> {
        manage::prioritize_question(self, request, hotquestion_id, question_id, direction).await
    }

    // 导出 CSV
    pub async fn export_questions(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        query: RoundQuery,
    ) -> ActixResult<HttpResponse> {
        export::export_questions(self, request, hotquestion_id, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::at;

    fn round(id: i64, start: i64, end: Option<i64>) -> Round {
        Round {
            id,
            hotquestion_id: 1,
            start_time: at(start),
            end_time: end.map(at),
        }
    }

    #[test]
    fn test_select_round_defaults_to_open() {
        let rounds = vec![round(1, 0, Some(10)), round(2, 10, None)];
        let (index, selected) = select_round(&rounds, None).expect("open round");
        assert_eq!((index, selected.id), (1, 2));

        let (index, selected) = select_round(&rounds, Some(1)).expect("round 1");
        assert_eq!((index, selected.id), (0, 1));

        assert!(select_round(&rounds, Some(3)).is_err());
    }
}
