use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::{AssignmentService, load_assignment};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::services::access::ensure_course_manager;

pub async fn delete_assignment(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (_, course) = load_assignment(storage.as_ref(), assignment_id).await?;
    ensure_course_manager(&user, &course)?;

    if !storage.delete_assignment(assignment_id).await? {
        return Err(CollegeError::not_found("Assignment not found").into());
    }

    warn!("Assignment {} deleted by user {}", assignment_id, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Assignment deleted successfully",
    )))
}
