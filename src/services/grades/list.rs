use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    grades::{entities::compute_gpa, requests::GradeQuery, responses::GradeListResponse},
    users::entities::UserType,
};
use crate::services::access::student_scope;
use crate::utils::RequestContext;

/// 学生只看自己，教师只看所授课程，管理员看全部；指定了学生时附带 GPA
pub async fn list_grades(
    service: &GradeService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query: GradeQuery = ctx.parse()?;

    let student_id = student_scope(&user, query.student_id)?;

    let course_ids = match user.user_type {
        UserType::Faculty => Some(storage.list_taught_course_ids(user.id).await?),
        _ => None,
    };

    let restricted = course_ids.is_some();
    let items = storage.list_grade_rows(student_id, course_ids).await?;

    // 教师只看到所授课程的行，GPA 仍按该学生的全部课程计算
    let gpa = match student_id {
        Some(id) if restricted => {
            let all = storage.list_grade_rows(Some(id), None).await?;
            Some(compute_gpa(all.iter().map(|r| (r.credits, r.grade_point))))
        }
        Some(_) => Some(compute_gpa(items.iter().map(|r| (r.credits, r.grade_point)))),
        None => None,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeListResponse { items, gpa },
        "Grades retrieved successfully",
    )))
}
