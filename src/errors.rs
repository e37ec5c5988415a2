//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称和 HTTP 状态码。
//! 错误实现了 `actix_web::ResponseError`，服务层可以直接用 `?` 返回。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_college_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum CollegeError {
            $($variant(String),)*
        }

        impl CollegeError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CollegeError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CollegeError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(CollegeError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CollegeError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl CollegeError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CollegeError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_college_errors! {
    DatabaseConfig("E001", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E002", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E003", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E004", "Serialization Error", INTERNAL_SERVER_ERROR),
    DateParse("E005", "Date Parse Error", BAD_REQUEST),
    PasswordHash("E006", "Password Hash Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    Authentication("E008", "Authentication Error", UNAUTHORIZED),
    Authorization("E009", "Authorization Error", FORBIDDEN),
    NotFound("E010", "Resource Not Found", NOT_FOUND),
    MethodNotAllowed("E011", "Method Not Allowed", METHOD_NOT_ALLOWED),
}

impl CollegeError {
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

    /// 响应体中使用的业务错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            CollegeError::Validation(_) | CollegeError::DateParse(_) => ErrorCode::BadRequest,
            CollegeError::Authentication(_) => ErrorCode::Unauthorized,
            CollegeError::Authorization(_) => ErrorCode::Forbidden,
            CollegeError::NotFound(_) => ErrorCode::NotFound,
            CollegeError::MethodNotAllowed(_) => ErrorCode::MethodNotAllowed,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for CollegeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CollegeError {}

impl ResponseError for CollegeError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        if self.status().is_server_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(self.status())
            .json(ApiResponse::error_empty(self.api_code(), self.message()))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CollegeError {
    fn from(err: sea_orm::DbErr) -> Self {
        CollegeError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CollegeError {
    fn from(err: serde_json::Error) -> Self {
        CollegeError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for CollegeError {
    fn from(err: chrono::ParseError) -> Self {
        CollegeError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CollegeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CollegeError::database_config("test").code(), "E001");
        assert_eq!(CollegeError::validation("test").code(), "E007");
        assert_eq!(CollegeError::authentication("test").code(), "E008");
        assert_eq!(CollegeError::method_not_allowed("test").code(), "E011");
    }

    #[test]
    fn test_error_status() {
        assert_eq!(
            CollegeError::validation("x").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CollegeError::authentication("x").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            CollegeError::authorization("x").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(CollegeError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            CollegeError::database_operation("x").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_error_message_passes_through() {
        let err: CollegeError = sea_orm::DbErr::Custom("UNIQUE constraint failed".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.message().contains("UNIQUE constraint failed"));
    }

    #[test]
    fn test_format_simple() {
        let err = CollegeError::validation("Invalid email");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid email"));
    }
}
