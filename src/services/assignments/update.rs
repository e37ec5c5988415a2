use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, check_marks, load_assignment};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    assignments::requests::{AssignmentChanges, UpdateAssignmentRequest},
};
use crate::services::access::ensure_course_manager;
use crate::utils::RequestContext;
use crate::utils::time::parse_datetime;

pub async fn update_assignment(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (_, course) = load_assignment(storage.as_ref(), assignment_id).await?;
    ensure_course_manager(&user, &course)?;

    let update: UpdateAssignmentRequest = ctx.parse_update(UpdateAssignmentRequest::FIELDS)?;

    if let Some(ref title) = update.title
        && title.trim().is_empty()
    {
        return Err(CollegeError::validation("title cannot be empty").into());
    }
    check_marks(update.total_marks, update.weightage)?;

    let due_date = match update.due_date {
        Some(ref value) => Some(parse_datetime(value)?.timestamp()),
        None => None,
    };

    let changes = AssignmentChanges {
        title: update.title.map(|t| t.trim().to_string()),
        description: update.description,
        due_date,
        total_marks: update.total_marks,
        weightage: update.weightage,
    };

    let updated = storage
        .update_assignment(assignment_id, changes)
        .await?
        .ok_or_else(|| CollegeError::not_found("Assignment not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Assignment updated successfully",
    )))
}
