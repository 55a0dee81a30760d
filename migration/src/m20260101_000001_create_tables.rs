use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程成员表
        manager
            .create_table(
                Table::create()
                    .table(CourseUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseUsers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CourseUsers::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(CourseUsers::UserId).big_integer().not_null())
                    .col(ColumnDef::new(CourseUsers::Role).string().not_null())
                    .col(
                        ColumnDef::new(CourseUsers::JoinedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseUsers::Table, CourseUsers::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseUsers::Table, CourseUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 Hot Question 活动表
        manager
            .create_table(
                Table::create()
                    .table(HotQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HotQuestions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HotQuestions::Name).string().not_null())
                    .col(ColumnDef::new(HotQuestions::Intro).text().null())
                    .col(
                        ColumnDef::new(HotQuestions::AnonymousPost)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::RequireApproval)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::HeatLimit)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(HotQuestions::TimeOpen).big_integer().null())
                    .col(ColumnDef::new(HotQuestions::TimeClose).big_integer().null())
                    .col(
                        ColumnDef::new(HotQuestions::ViewAfterClose)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::QuestionLabel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::PriorityLabel)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HotQuestions::HeatLabel).string().not_null())
                    .col(
                        ColumnDef::new(HotQuestions::RemoveLabel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::ApprovalLabel)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::GradeMax)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::FactorPriority)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::FactorHeat)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::FactorVote)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::CompletionPost)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::CompletionVote)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HotQuestions::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(HotQuestions::Table, HotQuestions::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建轮次表（end_time = 0 表示当前开放轮次）
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rounds::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Rounds::HotquestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Rounds::StartTime).big_integer().not_null())
                    .col(
                        ColumnDef::new(Rounds::EndTime)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Rounds::Table, Rounds::HotquestionId)
                            .to(HotQuestions::Table, HotQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建问题表
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Questions::HotquestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Questions::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Questions::Content).text().not_null())
                    .col(ColumnDef::new(Questions::Time).big_integer().not_null())
                    .col(
                        ColumnDef::new(Questions::Anonymous)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Questions::Approved)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Questions::Tpriority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::HotquestionId)
                            .to(HotQuestions::Table, HotQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Questions::Table, Questions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建投票（热度）表
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Votes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Votes::QuestionId).big_integer().not_null())
                    .col(ColumnDef::new(Votes::VoterId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Votes::Table, Votes::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Votes::Table, Votes::VoterId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩缓存表
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Grades::HotquestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Grades::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Grades::RawRating).double().not_null())
                    .col(ColumnDef::new(Grades::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Grades::Table, Grades::HotquestionId)
                            .to(HotQuestions::Table, HotQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩册表
        manager
            .create_table(
                Table::create()
                    .table(GradebookEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GradebookEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GradebookEntries::HotquestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradebookEntries::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradebookEntries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(GradebookEntries::Grade).double().not_null())
                    .col(
                        ColumnDef::new(GradebookEntries::GradeMax)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GradebookEntries::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GradebookEntries::Table, GradebookEntries::HotquestionId)
                            .to(HotQuestions::Table, HotQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建问题评论表
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Comments::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Comments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Comments::Content).text().not_null())
                    .col(ColumnDef::new(Comments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Comments::Table, Comments::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建日历事件表
        manager
            .create_table(
                Table::create()
                    .table(CalendarEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CalendarEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::HotquestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::EventType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CalendarEvents::Name).string().not_null())
                    .col(
                        ColumnDef::new(CalendarEvents::TimeStart)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CalendarEvents::Table, CalendarEvents::HotquestionId)
                            .to(HotQuestions::Table, HotQuestions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_users_course_user")
                    .table(CourseUsers::Table)
                    .col(CourseUsers::CourseId)
                    .col(CourseUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hotquestions_course_id")
                    .table(HotQuestions::Table)
                    .col(HotQuestions::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_rounds_hotquestion_id")
                    .table(Rounds::Table)
                    .col(Rounds::HotquestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_questions_hotquestion_time")
                    .table(Questions::Table)
                    .col(Questions::HotquestionId)
                    .col(Questions::Time)
                    .to_owned(),
            )
            .await?;

        // 每个用户对每个问题只能投一票
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_votes_question_voter")
                    .table(Votes::Table)
                    .col(Votes::QuestionId)
                    .col(Votes::VoterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_grades_hotquestion_user")
                    .table(Grades::Table)
                    .col(Grades::HotquestionId)
                    .col(Grades::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_gradebook_hotquestion_user")
                    .table(GradebookEntries::Table)
                    .col(GradebookEntries::HotquestionId)
                    .col(GradebookEntries::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_question_id")
                    .table(Comments::Table)
                    .col(Comments::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_calendar_events_hotquestion_type")
                    .table(CalendarEvents::Table)
                    .col(CalendarEvents::HotquestionId)
                    .col(CalendarEvents::EventType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(CalendarEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GradebookEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Votes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HotQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseUsers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    TeacherId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CourseUsers {
    #[sea_orm(iden = "course_users")]
    Table,
    Id,
    CourseId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum HotQuestions {
    #[sea_orm(iden = "hotquestions")]
    Table,
    Id,
    CourseId,
    Name,
    Intro,
    AnonymousPost,
    RequireApproval,
    HeatLimit,
    TimeOpen,
    TimeClose,
    ViewAfterClose,
    QuestionLabel,
    PriorityLabel,
    HeatLabel,
    RemoveLabel,
    ApprovalLabel,
    GradeMax,
    FactorPriority,
    FactorHeat,
    FactorVote,
    CompletionPost,
    CompletionVote,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Rounds {
    #[sea_orm(iden = "hotquestion_rounds")]
    Table,
    Id,
    HotquestionId,
    StartTime,
    EndTime,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "hotquestion_questions")]
    Table,
    Id,
    HotquestionId,
    UserId,
    Content,
    Time,
    Anonymous,
    Approved,
    Tpriority,
}

#[derive(DeriveIden)]
enum Votes {
    #[sea_orm(iden = "hotquestion_votes")]
    Table,
    Id,
    QuestionId,
    VoterId,
}

#[derive(DeriveIden)]
enum Grades {
    #[sea_orm(iden = "hotquestion_grades")]
    Table,
    Id,
    HotquestionId,
    UserId,
    RawRating,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum GradebookEntries {
    #[sea_orm(iden = "gradebook_entries")]
    Table,
    Id,
    HotquestionId,
    CourseId,
    UserId,
    Grade,
    GradeMax,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Comments {
    #[sea_orm(iden = "hotquestion_comments")]
    Table,
    Id,
    QuestionId,
    UserId,
    Content,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CalendarEvents {
    #[sea_orm(iden = "calendar_events")]
    Table,
    Id,
    HotquestionId,
    CourseId,
    EventType,
    Name,
    TimeStart,
}
