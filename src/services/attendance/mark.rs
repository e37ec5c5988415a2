use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AttendanceService, parse_status};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse, attendance::requests::MarkAttendanceRequest, users::Permission,
};
use crate::services::access::{ensure_course_manager, load_course, require_permission};
use crate::utils::RequestContext;
use crate::utils::validate::validate_date;

/// 未选课的学生静默跳过，整批在一个事务中写入
pub async fn mark_attendance(
    service: &AttendanceService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::MarkAttendance)?;

    let req: MarkAttendanceRequest = ctx.parse_required(&["course_id", "date", "records"])?;

    let date = req.date.trim();
    validate_date(date).map_err(CollegeError::validation)?;
    if req.records.is_empty() {
        return Err(CollegeError::validation("records must not be empty").into());
    }

    let mut records = Vec::with_capacity(req.records.len());
    for entry in req.records {
        let status = parse_status(&entry.status)?;
        records.push((entry.student_id, status, entry.remarks));
    }

    let course = load_course(storage.as_ref(), req.course_id).await?;
    ensure_course_manager(&user, &course)?;

    let result = storage
        .mark_attendance(course.id, date, user.id, records)
        .await?;

    info!(
        "Attendance for course {} on {}: {} inserted, {} updated, {} skipped",
        course.code, date, result.inserted, result.updated, result.skipped
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        result,
        "Attendance marked successfully",
    )))
}
