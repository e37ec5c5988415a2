pub mod assignments;

pub mod attendance;

pub mod auth;

pub mod courses;

pub mod departments;

pub mod grades;

pub mod health;

pub mod notices;

pub mod users;

pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use departments::configure_department_routes;
pub use grades::configure_grade_routes;
pub use health::configure_health_routes;
pub use notices::configure_notice_routes;
pub use users::configure_user_routes;

use actix_web::{HttpRequest, HttpResponse, http::Method, http::StatusCode};

use crate::middlewares::create_error_response;
use crate::models::ErrorCode;

/// 作用域内未匹配的方法或动作
pub(crate) async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        return HttpResponse::Ok().finish();
    }
    create_error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::MethodNotAllowed,
        &format!("Method {} not allowed for {}", req.method(), req.path()),
    )
}
