use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, assignments::requests::SubmissionQuery};
use crate::services::access::{
    ensure_course_manager, ensure_course_reader, student_scope,
};
use crate::utils::RequestContext;

/// 任课教师和管理员看到全部提交，学生只看到自己的
pub async fn list_submissions(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (assignment, course) = load_assignment(storage.as_ref(), assignment_id).await?;

    if user.user_type.is_student() {
        ensure_course_reader(storage.as_ref(), &user, &course).await?;
        let own: Vec<_> = storage
            .get_submission(assignment.id, user.id)
            .await?
            .into_iter()
            .collect();
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            own,
            "Submissions retrieved successfully",
        )));
    }

    ensure_course_manager(&user, &course)?;
    let submissions = storage.list_submissions(assignment.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submissions,
        "Submissions retrieved successfully",
    )))
}

pub async fn get_submission(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query: SubmissionQuery = ctx.parse()?;

    // 学生请求别人的提交在访问课程之前就拒绝
    let student_id = student_scope(&user, query.student_id)?;
    let (assignment, course) = load_assignment(storage.as_ref(), assignment_id).await?;

    let student_id = if user.user_type.is_student() {
        ensure_course_reader(storage.as_ref(), &user, &course).await?;
        user.id
    } else {
        ensure_course_manager(&user, &course)?;
        ctx.require(&["student_id"])?;
        student_id.ok_or_else(|| CollegeError::validation("Missing required parameters: student_id"))?
    };

    let submission = storage
        .get_submission(assignment.id, student_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Submission not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission retrieved successfully",
    )))
}
