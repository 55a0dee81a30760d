pub mod rating;
pub mod recalc;
pub mod table;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{current_user, error_response};
use crate::config::AppConfig;
use crate::models::{ApiResponse, grades::requests::GradingTableParams};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    // 评分表
    pub async fn grading_table(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        params: GradingTableParams,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let user = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };

        let default_size = AppConfig::get().hotquestion.default_page_size;
        match table::grading_table(storage.as_ref(), &user, hotquestion_id, params, default_size)
            .await
        {
            Ok(table) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                table,
                "Grading table retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
