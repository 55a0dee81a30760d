//! 课程与课程成员存储操作

use super::SeaOrmStorage;
use crate::entity::course_users::{
    ActiveModel as CourseUserActiveModel, Column as CourseUserColumn, Entity as CourseUsers,
};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{HotQuestionError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Course, CourseUser, CourseUserRole},
        requests::{CourseListParams, CreateCourseRequest},
        responses::CourseListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程，并将创建者登记为课程教师
    pub async fn create_course_impl(
        &self,
        teacher_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let course = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("创建课程失败: {e}")))?;

        CourseUserActiveModel {
            course_id: Set(course.id),
            user_id: Set(teacher_id),
            role: Set(CourseUserRole::Teacher.to_string()),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| HotQuestionError::database_operation(format!("登记课程教师失败: {e}")))?;

        txn.commit().await?;
        Ok(course.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        user_id: Option<i64>,
        query: CourseListParams,
    ) -> Result<CourseListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Courses::find();

        if let Some(user_id) = user_id {
            let course_ids: Vec<i64> = CourseUsers::find()
                .filter(CourseUserColumn::UserId.eq(user_id))
                .all(&self.db)
                .await
                .map_err(|e| {
                    HotQuestionError::database_operation(format!("查询用户课程关联失败: {e}"))
                })?
                .into_iter()
                .map(|cu| cu.course_id)
                .collect();

            if course_ids.is_empty() {
                return Ok(CourseListResponse {
                    items: vec![],
                    pagination: PaginationInfo::new(page, size, 0),
                });
            }
            select = select.filter(Column::Id.is_in(course_ids));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询课程总数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 登记课程成员
    pub async fn enrol_user_impl(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseUserRole,
    ) -> Result<CourseUser> {
        let now = chrono::Utc::now().timestamp();

        let model = CourseUserActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("登记课程成员失败: {e}")))?;

        Ok(result.into_course_user())
    }

    pub async fn get_course_user_impl(
        &self,
        course_id: i64,
        user_id: i64,
    ) -> Result<Option<CourseUser>> {
        let result = CourseUsers::find()
            .filter(
                Condition::all()
                    .add(CourseUserColumn::CourseId.eq(course_id))
                    .add(CourseUserColumn::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询课程成员失败: {e}")))?;

        Ok(result.map(|m| m.into_course_user()))
    }

    pub async fn list_course_users_impl(
        &self,
        course_id: i64,
        role: Option<CourseUserRole>,
    ) -> Result<Vec<CourseUser>> {
        let mut select = CourseUsers::find().filter(CourseUserColumn::CourseId.eq(course_id));

        if let Some(role) = role {
            select = select.filter(CourseUserColumn::Role.eq(role.to_string()));
        }

        let members = select
            .order_by_asc(CourseUserColumn::JoinedAt)
            .order_by_asc(CourseUserColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("查询课程成员列表失败: {e}")))?;

        Ok(members.into_iter().map(|m| m.into_course_user()).collect())
    }
}
