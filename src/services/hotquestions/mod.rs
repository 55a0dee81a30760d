pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod reset;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::{calendar, current_user, error_response};
use crate::models::{
    ApiResponse,
    calendar::responses::CalendarEventListResponse,
    hotquestions::requests::{CreateHotQuestionRequest, UpdateHotQuestionRequest},
};
use crate::storage::Storage;

pub struct HotQuestionService {
    storage: Option<Arc<dyn Storage>>,
}

impl HotQuestionService {
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

    // 课程内活动列表
    pub async fn list_course_hotquestions(
        &self,
        request: &HttpRequest,
        course_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_course_hotquestions(self, request, course_id).await
    }

    pub async fn create_hotquestion(
        &self,
        request: &HttpRequest,
        course_id: i64,
        req: CreateHotQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_hotquestion(self, request, course_id, req).await
    }

    pub async fn get_hotquestion(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_hotquestion(self, request, hotquestion_id).await
    }

    pub async fn update_hotquestion(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
        update: UpdateHotQuestionRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_hotquestion(self, request, hotquestion_id, update).await
    }

    pub async fn delete_hotquestion(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_hotquestion(self, request, hotquestion_id).await
    }

    // 清空用户数据
    pub async fn reset_hotquestion(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        reset::reset_hotquestion(self, request, hotquestion_id).await
    }

    // 当前用户的完成状态
    pub async fn get_completion(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_completion(self, request, hotquestion_id).await
    }

    pub async fn list_calendar_events(
        &self,
        request: &HttpRequest,
        hotquestion_id: i64,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request);
        let user = match current_user(request) {
            Ok(user) => user,
            Err(e) => return Ok(error_response(&e)),
        };

        match calendar::list_events(storage.as_ref(), &user, hotquestion_id).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                CalendarEventListResponse { items },
                "Calendar events retrieved successfully",
            ))),
            Err(e) => Ok(error_response(&e)),
        }
    }
}
