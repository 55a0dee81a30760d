//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod calendar;
mod comments;
mod courses;
mod grades;
mod hotquestions;
mod privacy;
mod questions;
mod rounds;
mod users;
mod votes;

use crate::config::AppConfig;
use crate::errors::{HotQuestionError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| HotQuestionError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| HotQuestionError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| HotQuestionError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 内存 SQLite，仅用于测试
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| HotQuestionError::database_config(format!("SQLite URL 解析失败: {e}")))?;

        // 内存库随连接销毁，必须固定为单连接
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| HotQuestionError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Migrator::up(&db, None)
            .await
            .map_err(|e| HotQuestionError::database_operation(format!("数据库迁移失败: {e}")))?;

        Ok(Self { db })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(HotQuestionError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn list_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>> {
        self.list_users_by_ids_impl(ids).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 课程模块
    async fn create_course(&self, teacher_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(teacher_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        user_id: Option<i64>,
        query: CourseListParams,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(user_id, query).await
    }

    async fn enrol_user(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseUserRole,
    ) -> Result<CourseUser> {
        self.enrol_user_impl(course_id, user_id, role).await
    }

    async fn get_course_user(&self, course_id: i64, user_id: i64) -> Result<Option<CourseUser>> {
        self.get_course_user_impl(course_id, user_id).await
    }

    async fn list_course_users(
        &self,
        course_id: i64,
        role: Option<CourseUserRole>,
    ) -> Result<Vec<CourseUser>> {
        self.list_course_users_impl(course_id, role).await
    }

    // 活动模块
    async fn create_hotquestion(
        &self,
        course_id: i64,
        req: CreateHotQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<(HotQuestion, Round)> {
        self.create_hotquestion_impl(course_id, req, now).await
    }

    async fn get_hotquestion_by_id(&self, id: i64) -> Result<Option<HotQuestion>> {
        self.get_hotquestion_by_id_impl(id).await
    }

    async fn update_hotquestion(
        &self,
        id: i64,
        update: UpdateHotQuestionRequest,
        now: DateTime<Utc>,
    ) -> Result<Option<HotQuestion>> {
        self.update_hotquestion_impl(id, update, now).await
    }

    async fn delete_hotquestion(&self, id: i64) -> Result<bool> {
        self.delete_hotquestion_impl(id).await
    }

    async fn list_course_hotquestions(&self, course_id: i64) -> Result<Vec<HotQuestion>> {
        self.list_course_hotquestions_impl(course_id).await
    }

    async fn reset_hotquestion(&self, id: i64, now: DateTime<Utc>) -> Result<Round> {
        self.reset_hotquestion_impl(id, now).await
    }

    // 轮次模块
    async fn list_rounds(&self, hotquestion_id: i64) -> Result<Vec<Round>> {
        self.list_rounds_impl(hotquestion_id).await
    }

    async fn get_round_by_id(&self, round_id: i64) -> Result<Option<Round>> {
        self.get_round_by_id_impl(round_id).await
    }

    async fn get_current_round(&self, hotquestion_id: i64) -> Result<Option<Round>> {
        self.get_current_round_impl(hotquestion_id).await
    }

    async fn start_new_round(&self, hotquestion_id: i64, now: DateTime<Utc>) -> Result<Round> {
        self.start_new_round_impl(hotquestion_id, now).await
    }

    async fn remove_round(
        &self,
        round_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Option<RoundRemoval>> {
        self.remove_round_impl(round_id, now).await
    }

    // 问题模块
    async fn create_question(&self, question: NewQuestion) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question_by_id(&self, id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(id).await
    }

    async fn list_round_questions(&self, round: &Round) -> Result<Vec<Question>> {
        self.list_round_questions_impl(round).await
    }

    async fn list_hotquestion_questions(&self, hotquestion_id: i64) -> Result<Vec<Question>> {
        self.list_hotquestion_questions_impl(hotquestion_id).await
    }

    async fn count_questions(&self, hotquestion_id: i64, user_id: Option<i64>) -> Result<i64> {
        self.count_questions_impl(hotquestion_id, user_id).await
    }

    async fn set_question_approved(&self, id: i64, approved: bool) -> Result<Option<Question>> {
        self.set_question_approved_impl(id, approved).await
    }

    async fn adjust_question_priority(&self, id: i64, delta: i32) -> Result<Option<Question>> {
        self.adjust_question_priority_impl(id, delta).await
    }

    async fn delete_question(&self, id: i64) -> Result<Option<(Question, Vec<i64>)>> {
        self.delete_question_impl(id).await
    }

    // 投票模块
    async fn toggle_vote(&self, question_id: i64, voter_id: i64) -> Result<bool> {
        self.toggle_vote_impl(question_id, voter_id).await
    }

    async fn list_votes_for_questions(&self, question_ids: &[i64]) -> Result<Vec<Vote>> {
        self.list_votes_for_questions_impl(question_ids).await
    }

    async fn list_hotquestion_votes(&self, hotquestion_id: i64) -> Result<Vec<Vote>> {
        self.list_hotquestion_votes_impl(hotquestion_id).await
    }

    async fn count_round_votes_by_user(&self, round: &Round, voter_id: i64) -> Result<i64> {
        self.count_round_votes_by_user_impl(round, voter_id).await
    }

    // 评分模块
    async fn upsert_grade(
        &self,
        hotquestion_id: i64,
        user_id: i64,
        raw_rating: f64,
        now: DateTime<Utc>,
    ) -> Result<Grade> {
        self.upsert_grade_impl(hotquestion_id, user_id, raw_rating, now)
            .await
    }

    async fn get_grade(&self, hotquestion_id: i64, user_id: i64) -> Result<Option<Grade>> {
        self.get_grade_impl(hotquestion_id, user_id).await
    }

    async fn list_grades(&self, hotquestion_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_impl(hotquestion_id).await
    }

    async fn upsert_gradebook_entry(
        &self,
        hotquestion: &HotQuestion,
        user_id: i64,
        grade: f64,
        now: DateTime<Utc>,
    ) -> Result<GradebookEntry> {
        self.upsert_gradebook_entry_impl(hotquestion, user_id, grade, now)
            .await
    }

    async fn get_gradebook_entry(
        &self,
        hotquestion_id: i64,
        user_id: i64,
    ) -> Result<Option<GradebookEntry>> {
        self.get_gradebook_entry_impl(hotquestion_id, user_id).await
    }

    async fn delete_gradebook_entries(
        &self,
        hotquestion_id: i64,
        user_id: Option<i64>,
    ) -> Result<u64> {
        self.delete_gradebook_entries_impl(hotquestion_id, user_id)
            .await
    }

    // 评论模块
    async fn create_comment(
        &self,
        question_id: i64,
        user_id: i64,
        content: String,
        now: DateTime<Utc>,
    ) -> Result<Comment> {
        self.create_comment_impl(question_id, user_id, content, now)
            .await
    }

    async fn get_comment_by_id(&self, id: i64) -> Result<Option<Comment>> {
        self.get_comment_by_id_impl(id).await
    }

    async fn list_comments(&self, question_id: i64) -> Result<Vec<Comment>> {
        self.list_comments_impl(question_id).await
    }

    async fn delete_comment(&self, id: i64) -> Result<bool> {
        self.delete_comment_impl(id).await
    }

    // 日历模块
    async fn upsert_calendar_event(
        &self,
        hotquestion: &HotQuestion,
        event_type: CalendarEventType,
        name: String,
        time_start: DateTime<Utc>,
    ) -> Result<CalendarEvent> {
        self.upsert_calendar_event_impl(hotquestion, event_type, name, time_start)
            .await
    }

    async fn delete_calendar_event(
        &self,
        hotquestion_id: i64,
        event_type: CalendarEventType,
    ) -> Result<bool> {
        self.delete_calendar_event_impl(hotquestion_id, event_type)
            .await
    }

    async fn list_calendar_events(&self, hotquestion_id: i64) -> Result<Vec<CalendarEvent>> {
        self.list_calendar_events_impl(hotquestion_id).await
    }

    // 隐私模块
    async fn list_user_hotquestion_ids(&self, user_id: i64) -> Result<Vec<i64>> {
        self.list_user_hotquestion_ids_impl(user_id).await
    }

    async fn list_user_questions(
        &self,
        user_id: i64,
        hotquestion_id: i64,
    ) -> Result<Vec<Question>> {
        self.list_user_questions_impl(user_id, hotquestion_id).await
    }

    async fn list_user_votes(&self, user_id: i64, hotquestion_id: i64) -> Result<Vec<Vote>> {
        self.list_user_votes_impl(user_id, hotquestion_id).await
    }

    async fn list_user_comments(&self, user_id: i64, hotquestion_id: i64) -> Result<Vec<Comment>> {
        self.list_user_comments_impl(user_id, hotquestion_id).await
    }

    async fn delete_user_data(
        &self,
        user_id: i64,
        hotquestion_id: Option<i64>,
    ) -> Result<UserDataDeletion> {
        self.delete_user_data_impl(user_id, hotquestion_id).await
    }
}
