use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_assignment};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse, assignments::requests::GradeSubmissionRequest, users::Permission,
};
use crate::services::access::{ensure_course_manager, require_permission};
use crate::utils::RequestContext;

pub async fn grade_submission(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::GradeSubmission)?;

    let (assignment, course) = load_assignment(storage.as_ref(), assignment_id).await?;
    ensure_course_manager(&user, &course)?;

    let req: GradeSubmissionRequest = ctx.parse_required(&["student_id", "score"])?;

    // 分数越界时不写入任何内容
    if req.score < 0.0 || req.score > assignment.total_marks {
        return Err(CollegeError::validation(format!(
            "score must be between 0 and {}",
            assignment.total_marks
        ))
        .into());
    }

    let submission = storage
        .grade_submission(assignment.id, req.student_id, req.score, req.feedback, user.id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Submission not found"))?;

    info!(
        "Submission of student {} for assignment {} graded by {}",
        req.student_id, assignment.id, user.id
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission graded successfully",
    )))
}
