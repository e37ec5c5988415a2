use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, check_marks};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    assignments::requests::{CreateAssignmentRequest, NewAssignment},
    users::Permission,
};
use crate::services::access::{ensure_course_manager, require_permission};
use crate::utils::RequestContext;
use crate::utils::time::parse_datetime;

pub async fn create_assignment(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::CreateAssignment)?;

    let req: CreateAssignmentRequest =
        ctx.parse_required(&["course_id", "title", "due_date", "total_marks"])?;

    let course = storage
        .get_course_by_id(req.course_id)
        .await?
        .ok_or_else(|| CollegeError::validation(format!("Course {} does not exist", req.course_id)))?;
    ensure_course_manager(&user, &course)?;

    check_marks(Some(req.total_marks), req.weightage)?;
    let due_date = parse_datetime(&req.due_date)?;

    let assignment = storage
        .create_assignment(NewAssignment {
            course_id: course.id,
            title: req.title.trim().to_string(),
            description: req.description,
            due_date: due_date.timestamp(),
            total_marks: req.total_marks,
            weightage: req.weightage.unwrap_or(0.0),
            created_by: user.id,
        })
        .await?;

    info!(
        "Assignment {} created in course {} by user {}",
        assignment.id, course.code, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        assignment,
        "Assignment created successfully",
    )))
}
