use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::GradeService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    grades::{
        entities::{AssignmentScore, total_weighted},
        requests::GradeQuery,
        responses::AssignmentBreakdownResponse,
    },
};
use crate::services::access::{
    ensure_course_manager, ensure_course_reader, load_course, student_scope,
};
use crate::utils::RequestContext;

/// 每个作业：百分比 = 得分 / 总分 × 100，加权 = 百分比 × 权重 / 100
pub async fn assignment_breakdown(
    service: &GradeService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query: GradeQuery = ctx.parse()?;

    let student_id = student_scope(&user, query.student_id)?;
    let course = load_course(storage.as_ref(), course_id).await?;

    let student_id = if user.user_type.is_student() {
        ensure_course_reader(storage.as_ref(), &user, &course).await?;
        user.id
    } else {
        ensure_course_manager(&user, &course)?;
        student_id.ok_or_else(|| CollegeError::validation("Missing required parameters: student_id"))?
    };

    let assignments = storage.list_assignments(Some(vec![course.id])).await?;
    let ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();
    let mut submissions: HashMap<i64, _> = if ids.is_empty() {
        HashMap::new()
    } else {
        storage
            .list_student_submissions(student_id, ids)
            .await?
            .into_iter()
            .map(|s| (s.assignment_id, s))
            .collect()
    };

    let items: Vec<AssignmentScore> = assignments
        .into_iter()
        .map(|a| {
            let submission = submissions.remove(&a.id);
            AssignmentScore::compute(
                a.id,
                a.title,
                a.total_marks,
                a.weightage,
                submission.as_ref().and_then(|s| s.score),
                submission.map(|s| s.status.to_string()),
            )
        })
        .collect();
    let total = total_weighted(&items);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentBreakdownResponse {
            course_id: course.id,
            student_id,
            items,
            total_weighted: total,
        },
        "Assignment breakdown retrieved successfully",
    )))
}
