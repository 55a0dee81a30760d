//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_hotquestion_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum HotQuestionError {
            $($variant(String),)*
        }

        impl HotQuestionError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(HotQuestionError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(HotQuestionError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(HotQuestionError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl HotQuestionError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        HotQuestionError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_hotquestion_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Conflict"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    ActivityClosed("E014", "Activity Closed"),
    HeatExhausted("E015", "Heat Exhausted"),
}

impl HotQuestionError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for HotQuestionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for HotQuestionError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for HotQuestionError {
    fn from(err: sea_orm::DbErr) -> Self {
        HotQuestionError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for HotQuestionError {
    fn from(err: std::io::Error) -> Self {
        HotQuestionError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for HotQuestionError {
    fn from(err: serde_json::Error) -> Self {
        HotQuestionError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for HotQuestionError {
    fn from(err: csv::Error) -> Self {
        HotQuestionError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HotQuestionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(HotQuestionError::cache_connection("test").code(), "E001");
        assert_eq!(HotQuestionError::database_config("test").code(), "E003");
        assert_eq!(HotQuestionError::validation("test").code(), "E007");
        assert_eq!(HotQuestionError::not_found("test").code(), "E008");
        assert_eq!(HotQuestionError::authorization("test").code(), "E013");
        assert_eq!(HotQuestionError::activity_closed("test").code(), "E014");
        assert_eq!(HotQuestionError::heat_exhausted("test").code(), "E015");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            HotQuestionError::conflict("test").error_type(),
            "Conflict"
        );
        assert_eq!(
            HotQuestionError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = HotQuestionError::not_found("问题不存在");
        assert_eq!(err.message(), "问题不存在");
    }

    #[test]
    fn test_db_error_conversion() {
        let err: HotQuestionError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.format_simple().contains("boom"));
    }
}
