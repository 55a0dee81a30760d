//! 预导入模块，方便使用

pub use super::calendar_events::{
    ActiveModel as CalendarEventActiveModel, Entity as CalendarEvents,
    Model as CalendarEventModel,
};
pub use super::comments::{
    ActiveModel as CommentActiveModel, Entity as Comments, Model as CommentModel,
};
pub use super::course_users::{
    ActiveModel as CourseUserActiveModel, Entity as CourseUsers, Model as CourseUserModel,
};
pub use super::courses::{ActiveModel as CourseActiveModel, Entity as Courses, Model as CourseModel};
pub use super::gradebook_entries::{
    ActiveModel as GradebookEntryActiveModel, Entity as GradebookEntries,
    Model as GradebookEntryModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::hotquestions::{
    ActiveModel as HotQuestionActiveModel, Entity as HotQuestions, Model as HotQuestionModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::rounds::{ActiveModel as RoundActiveModel, Entity as Rounds, Model as RoundModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
pub use super::votes::{ActiveModel as VoteActiveModel, Entity as Votes, Model as VoteModel};
