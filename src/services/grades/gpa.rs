use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    grades::{entities::compute_gpa, requests::GradeQuery},
};
use crate::services::access::{load_student, student_scope};
use crate::utils::RequestContext;

pub async fn student_gpa(
    service: &GradeService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query: GradeQuery = ctx.parse()?;

    let student_id = match student_scope(&user, query.student_id)? {
        Some(id) => id,
        None => {
            return Err(
                CollegeError::validation("Missing required parameters: student_id").into(),
            );
        }
    };
    load_student(storage.as_ref(), student_id).await?;

    let rows = storage.list_grade_rows(Some(student_id), None).await?;
    let summary = compute_gpa(rows.iter().map(|r| (r.credits, r.grade_point)));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "GPA calculated successfully",
    )))
}
