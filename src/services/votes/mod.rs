pub mod toggle;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct VoteService {
    storage: Option<Arc<dyn Storage>>,
}

impl VoteService {
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

    // 投票与撤销共用同一切换操作
    pub async fn vote(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        toggle::toggle_vote_handler(self, request, hotquestion_id, question_id).await
    }

    pub async fn unvote(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        question_id: i64,
    ) -> ActixResult<HttpResponse> {
        toggle::toggle_vote_handler(self, request, hotquestion_id, question_id).await
    }
}
