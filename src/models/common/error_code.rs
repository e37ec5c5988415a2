use serde::Serialize;

/// 响应信封中的业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    MethodNotAllowed = 1005,

    // 认证相关
    InvalidCredentials = 2000,
    AccountInactive = 2001,
    InvalidResetToken = 2002,

    // 业务冲突
    AlreadyExists = 3000,
    CourseFull = 3001,
    NotEnrolled = 3002,

    InternalServerError = 5000,
}

