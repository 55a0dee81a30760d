pub mod list;
pub mod remove;
pub mod start;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{HotQuestionError, Result};
use crate::models::rounds::entities::Round;
use crate::storage::Storage;

/// 活动当前进行中的轮次
pub async fn current_round(storage: &dyn Storage, hotquestion_id: i64) -> Result<Round> {
    storage
        .get_current_round(hotquestion_id)
        .await?
        .ok_or_else(|| {
            HotQuestionError::not_found(format!("活动没有进行中的轮次: {hotquestion_id}"))
        })
}

pub struct RoundService {
    storage: Option<Arc<dyn Storage>>,
}

impl RoundService {
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

    pub async fn list_rounds(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_rounds_handler(self, request, hotquestion_id).await
    }

    // 结束当前轮次并开启新一轮
    pub async fn start_round(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        start::start_round(self, request, hotquestion_id).await
    }

    pub async fn remove_round(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        round_id: i64,
    ) -> ActixResult<HttpResponse> {
        remove::remove_round_handler(self, request, hotquestion_id, round_id).await
    }
}
