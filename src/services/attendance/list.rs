use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, attendance::requests::AttendanceQuery};
use crate::services::access::{
    ensure_course_manager, ensure_course_reader, load_course, student_scope,
};
use crate::utils::RequestContext;
use crate::utils::validate::validate_date;

pub async fn list_attendance(
    service: &AttendanceService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    ctx.require(&["course_id"])?;
    let mut query: AttendanceQuery = ctx.parse()?;

    // 学生请求别人的记录直接拒绝
    query.student_id = student_scope(&user, query.student_id)?;

    if let Some(ref date) = query.date {
        validate_date(date.trim()).map_err(CollegeError::validation)?;
        query.date = Some(date.trim().to_string());
    }

    let course_id = query
        .course_id
        .ok_or_else(|| CollegeError::validation("Missing required parameters: course_id"))?;
    let course = load_course(storage.as_ref(), course_id).await?;
    if user.user_type.is_student() {
        ensure_course_reader(storage.as_ref(), &user, &course).await?;
    } else {
        ensure_course_manager(&user, &course)?;
    }

    let records = storage.list_attendance(query).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        records,
        "Attendance retrieved successfully",
    )))
}
