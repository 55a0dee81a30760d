use crate::errors::HotQuestionError;

/// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户 2xxx
    AuthFailed = 2000,
    RegisterFailed = 2001,
    UserAlreadyExists = 2003,

    // 课程 3xxx
    CourseAlreadyJoined = 3002,

    // Hot Question 4xxx
    HotQuestionClosed = 4001,
    QuestionInvalid = 4004,
    VoteNotAllowed = 4005,
    HeatLimitReached = 4006,
    ExportFailed = 4008,
}

impl From<&HotQuestionError> for ErrorCode {
    fn from(err: &HotQuestionError) -> Self {
        match err {
            HotQuestionError::Validation(_) => ErrorCode::BadRequest,
            HotQuestionError::NotFound(_) => ErrorCode::NotFound,
            HotQuestionError::Conflict(_) => ErrorCode::Conflict,
            HotQuestionError::Authentication(_) => ErrorCode::Unauthorized,
            HotQuestionError::Authorization(_) => ErrorCode::Forbidden,
            HotQuestionError::ActivityClosed(_) => ErrorCode::HotQuestionClosed,
            HotQuestionError::HeatExhausted(_) => ErrorCode::HeatLimitReached,
            _ => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        assert_eq!(
            ErrorCode::from(&HotQuestionError::not_found("x")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&HotQuestionError::activity_closed("x")),
            ErrorCode::HotQuestionClosed
        );
        assert_eq!(
            ErrorCode::from(&HotQuestionError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(
            ErrorCode::from(&HotQuestionError::heat_exhausted("x")),
            ErrorCode::HeatLimitReached
        );
        assert_eq!(ErrorCode::HeatLimitReached as i32, 4006);
    }
}
