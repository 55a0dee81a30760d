pub mod delete;
pub mod export;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{HotQuestionError, Result};
use crate::models::{privacy::requests::DeleteUserDataQuery, users::entities::{User, UserRole}};
use crate::storage::Storage;

/// 只有本人或管理员可以导出/删除用户数据
pub(crate) fn require_self_or_admin(requester: &User, user_id: i64) -> Result<()> {
    if requester.id == user_id || requester.role == UserRole::Admin {
        Ok(())
    } else {
        Err(HotQuestionError::authorization("只能处理自己的数据"))
    }
}

pub struct PrivacyService {
    storage: Option<Arc<dyn Storage>>,
}

impl PrivacyService {
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

    // 导出用户在所有活动中的数据
    pub async fn export_user_data(
        &self,
        request: &HttpRequest,
        user_id: i64,
    ) -> ActixResult<HttpResponse> {
        export::export_user_data_handler(self, request, user_id).await
    }

    pub async fn delete_user_data(
        &self,
        request: &HttpRequest,
        user_id: i64,
        query: DeleteUserDataQuery,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user_data_handler(self, request, user_id, query).await
    }
}
