pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod courses;
pub mod departments;
pub mod grades;
pub mod notices;
pub mod users;

pub use common::{ApiResponse, AppStartTime, ErrorCode, PaginationInfo};
