use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    calendar::entities::{CalendarEvent, CalendarEventType},
    comments::entities::Comment,
    courses::{
        entities::{Course, CourseUser, CourseUserRole},
        requests::{CourseListParams, CreateCourseRequest},
        responses::CourseListResponse,
    },
    grades::entities::{Grade, GradebookEntry},
    hotquestions::{
        entities::HotQuestion,
        requests::{CreateHotQuestionRequest, UpdateHotQuestionRequest},
    },
    privacy::entities::UserDataDeletion,
    questions::entities::{NewQuestion, Question},
    rounds::entities::{Round, RoundRemoval},
    users::{entities::User, requests::CreateUserRequest},
    votes::entities::Vote,
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;
    // 批量获取用户
    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 课程管理方法
    // 创建课程，创建者自动成为课程教师
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 列出课程，`user_id` 为 None 时列出全部
    async fn list_courses_with_pagination(
        &self,
        user_id: Option<i64>,
        query: CourseListParams,
    ) -> Result<CourseListResponse>;
    async fn enrol_user(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseUserRole,
    ) -> Result<CourseUser>;
    async fn get_course_user(&self, course_id: i64, user_id: i64) -> Result<Option<CourseUser>>;
    async fn list_course_users(
        &self,
        course_id: i64,
        role: Option<CourseUserRole>,
    ) -> Result<Vec<CourseUser>>;

    /// 活动实例方法
    // 创建活动并开启第一轮
    async fn create_hotquestion(
        &self,
        course_id: i64,
        req: CreateHotQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<(HotQuestion, Round)>;
    async fn get_hotquestion_by_id(&self, id: i64) -> Result<Option<HotQuestion>>;
    async fn update_hotquestion(
        &self,
        id: i64,
        update: UpdateHotQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<HotQuestion>>;
    // 删除活动及其全部数据
    async fn delete_hotquestion(&self, id: i64) -> Result<bool>;
    async fn list_course_hotquestions(&self, course_id: i64) -> Result<Vec<HotQuestion>>;
    // 清空活动数据并开启新一轮
    async fn reset_hotquestion(&self, id: i64, now: DateTime<Utc>) -> Result<Round>;

    /// 轮次方法
    async fn list_rounds(&self, hotquestion_id: i64) -> Result<Vec<Round>>;
    async fn get_round_by_id(&self, round_id: i64) -> Result<Option<Round>>;
    async fn get_current_round(&self, hotquestion_id: i64) -> Result<Option<Round>>;
    // 结束当前轮次并开启新一轮
    async fn start_new_round(&self, hotquestion_id: i64, now: DateTime<Utc>) -> Result<Round>;
    async fn remove_round(&self, round_id: i64, now: DateTime<Utc>)
    -> Result<Option<RoundRemoval>>;

    /// 问题方法
    async fn create_question(&self, question: NewQuestion) -> Result<Question>;
    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>>;
    async fn list_round_questions(&self, round: &Round) -> Result<Vec<Question>>;
    async fn list_hotquestion_questions(&self, hotquestion_id: i64) -> Result<Vec<Question>>;
    // 统计问题数，`user_id` 为 None 时统计全部
    async fn count_questions(&self, hotquestion_id: i64, user_id: Option<i64>) -> Result<i64>;
    async fn set_question_approved(&self, id: i64, approved: bool) -> Result<Option<Question>>;
    async fn adjust_question_priority(&self, id: i64, delta: i32) -> Result<Option<Question>>;
    // 删除问题及其投票与评论，返回原问题与投票者
    async fn delete_question(&self, id: i64) -> Result<Option<(Question, Vec<i64>)>>;

    /// 投票方法
    // 存在则删除，否则插入；返回切换后是否已投票
    async fn toggle_vote(&self, question_id: i64, voter_id: i64) -> Result<bool>;
    async fn list_votes_for_questions(&self, question_ids: &[i64]) -> Result<Vec<Vote>>;
    async fn list_hotquestion_votes(&self, hotquestion_id: i64) -> Result<Vec<Vote>>;
    // 用户在某轮次中投出的票数
    async fn count_round_votes_by_user(&self, round: &Round, voter_id: i64) -> Result<i64>;

    /// 评分方法
    async fn upsert_grade(
        &self,
        hotquestion_id: i64,
        user_id: i64,
        raw_rating: f64,
        now: DateTime<Utc>,
    ) -> Result<Grade>;
    async fn get_grade(&self, hotquestion_id: i64, user_id: i64) -> Result<Option<Grade>>;
    async fn list_grades(&self, hotquestion_id: i64) -> Result<Vec<Grade>>;
    async fn upsert_gradebook_entry(
        &self,
        hotquestion: &HotQuestion,
        user_id: i64,
        grade: f64,
        now: DateTime<Utc>,
    ) -> Result<GradebookEntry>;
    async fn get_gradebook_entry(
        &self,
        hotquestion_id: i64,
        user_id: i64,
    ) -> Result<Option<GradebookEntry>>;
    async fn delete_gradebook_entries(
        &self,
        hotquestion_id: i64,
        user_id: Option<i64>,
    ) -> Result<u64>;

    /// 评论方法
    async fn create_comment(
        &self,
        question_id: i64,
        user_id: i64,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Comment>;
    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>>;
    async fn list_comments(&self, question_id: i64) -> Result<Vec<Comment>>;
    async fn delete_comment(&self, id: i64) -> Result<bool>;

    /// 日历事件方法
    async fn upsert_calendar_event(
        &self,
        hotquestion: &HotQuestion,
        event_type: CalendarEventType,
        name: String,
        time_start: DateTime<Utc>,
    ) -> Result<CalendarEvent>;
    async fn delete_calendar_event(
        &self,
        hotquestion_id: i64,
        event_type: CalendarEventType,
    ) -> Result<bool>;
    async fn list_calendar_events(&self, hotquestion_id: i64) -> Result<Vec<CalendarEvent>>;

    /// 隐私数据方法
    // 用户有数据的活动 ID
    async fn list_user_hotquestion_ids(&self, user_id: i64) -> Result<Vec<i64>>;
    async fn list_user_questions(&self, user_id: i64, hotquestion_id: i64)
    -> Result<Vec<Question>>;
    async fn list_user_votes(&self, user_id: i64, hotquestion_id: i64) -> Result<Vec<Vote>>;
    async fn list_user_comments(&self, user_id: i64, hotquestion_id: i64) -> Result<Vec<Comment>>;
    async fn delete_user_data(
        &self,
        user_id: i64,
        hotquestion_id: Option<i64>,
    ) -> Result<UserDataDeletion>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
