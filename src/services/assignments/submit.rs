use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_assignment};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    assignments::{
        entities::SubmissionStatus, requests::SubmitAssignmentRequest,
        responses::SubmitResponse,
    },
    users::Permission,
};
use crate::services::access::{ensure_course_reader, require_permission};
use crate::utils::RequestContext;

/// 首次提交返回 201，重新提交返回 200
pub async fn submit_assignment(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::SubmitAssignment)?;

    let (assignment, course) = load_assignment(storage.as_ref(), assignment_id).await?;
    ensure_course_reader(storage.as_ref(), &user, &course).await?;

    let req: SubmitAssignmentRequest = ctx.parse_required(&["file_path"])?;
    let file_path = req.file_path.trim();
    if file_path.is_empty() {
        return Err(CollegeError::validation("file_path cannot be empty").into());
    }

    // 迟交状态在提交时刻决定
    let status = SubmissionStatus::at_submit(chrono::Utc::now(), assignment.due_date);

    let (submission, resubmitted) = storage
        .upsert_submission(assignment.id, user.id, file_path, req.comments, status)
        .await?;

    info!(
        "Student {} submitted assignment {} ({}, resubmitted: {})",
        user.id, assignment.id, submission.status, resubmitted
    );

    let body = SubmitResponse {
        submission,
        resubmitted,
    };

    if resubmitted {
        Ok(HttpResponse::Ok().json(ApiResponse::success(body, "Assignment resubmitted")))
    } else {
        Ok(HttpResponse::Created().json(ApiResponse::success(body, "Assignment submitted")))
    }
}
