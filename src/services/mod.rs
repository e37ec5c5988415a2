pub mod access;
pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod departments;
pub mod grades;
pub mod notices;
pub mod users;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use departments::DepartmentService;
pub use grades::GradeService;
pub use notices::NoticeService;
pub use users::UserService;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::errors::{CollegeError, Result};
use crate::storage::Storage;

/// 优先使用服务自带的存储，否则从 app_data 中取
pub(crate) fn resolve_storage(
    own: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> Result<Arc<dyn Storage>> {
    if let Some(storage) = own {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| CollegeError::database_config("Storage not found in app data"))
}
