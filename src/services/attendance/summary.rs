use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;

use super::AttendanceService;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    common::serde_helpers::{deserialize_option_i64, deserialize_string_to_i64},
};
use crate::services::access::{
    ensure_course_manager, ensure_course_reader, load_course, student_scope,
};
use crate::utils::RequestContext;

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    #[serde(deserialize_with = "deserialize_string_to_i64")]
    course_id: i64,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    student_id: Option<i64>,
}

/// 出勤率 = (出勤 + 迟到) / 课程已记录的不同日期数
pub async fn attendance_summary(
    service: &AttendanceService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let query: SummaryQuery = ctx.parse_required(&["course_id"])?;
    let student_id = student_scope(&user, query.student_id)?;

    let course = load_course(storage.as_ref(), query.course_id).await?;
    if user.user_type.is_student() {
        ensure_course_reader(storage.as_ref(), &user, &course).await?;
    } else {
        ensure_course_manager(&user, &course)?;
    }

    let summary = storage.attendance_summary(course.id, student_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "Attendance summary retrieved successfully",
    )))
}
