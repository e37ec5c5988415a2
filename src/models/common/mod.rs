pub mod error_code;
pub mod pagination;
pub mod response;
pub mod serde_helpers;

pub use error_code::ErrorCode;
pub use pagination::PaginationInfo;
pub use response::ApiResponse;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
