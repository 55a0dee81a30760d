use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::Result;
use crate::models::{
    ApiResponse,
    courses::{requests::CourseListParams, responses::CourseListResponse},
    users::entities::{User, UserRole},
};
use crate::services::{current_user, error_response};
use crate::storage::Storage;

/// 管理员看到全部课程，其他用户只看到自己加入的课程
pub async fn list_courses(
    storage: &dyn Storage,
    user: &User,
    query: CourseListParams,
) -> Result<CourseListResponse> {
    let scope = match user.role {
        UserRole::Admin => None,
        _ => Some(user.id),
    };
    storage.list_courses_with_pagination(scope, query).await
}

pub async fn list_courses_handler(
    service: &CourseService,
    request: &HttpRequest,
    query: CourseListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let result = match current_user(request) {
        Ok(user) => list_courses(storage.as_ref(), &user, query).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "Course list retrieved"))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::services::test_support::{classroom, storage, user};

    fn params() -> CourseListParams {
        CourseListParams {
            pagination: PaginationQuery::default(),
        }
    }

    #[tokio::test]
    async fn test_enrolment_scopes_listing() {
        let storage = storage().await;
        let room = classroom(storage.as_ref(), 1).await;
        let outsider = user(storage.as_ref(), "outsider", UserRole::User).await;
        let admin = user(storage.as_ref(), "admin", UserRole::Admin).await;

        let mine = list_courses(storage.as_ref(), &room.students[0], params())
            .await
            .expect("list");
        assert_eq!(mine.items.len(), 1);
        assert_eq!(mine.items[0].id, room.course.id);

        let none = list_courses(storage.as_ref(), &outsider, params())
            .await
            .expect("list");
        assert!(none.items.is_empty());
        assert_eq!(none.pagination.total, 0);

        let all = list_courses(storage.as_ref(), &admin, params())
            .await
            .expect("list");
        assert_eq!(all.items.len(), 1);
    }
}
