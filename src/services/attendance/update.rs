use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, load_record, parse_status};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, attendance::requests::UpdateAttendanceRequest};
use crate::services::access::ensure_course_manager;
use crate::utils::RequestContext;

pub async fn update_attendance(
    service: &AttendanceService,
    CurrentUser(user): CurrentUser,
    record_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (_, course) = load_record(storage.as_ref(), record_id).await?;
    ensure_course_manager(&user, &course)?;

    let update: UpdateAttendanceRequest = ctx.parse_update(UpdateAttendanceRequest::FIELDS)?;
    let status = match update.status {
        Some(ref s) => Some(parse_status(s)?),
        None => None,
    };

    let record = storage
        .update_attendance(record_id, status, update.remarks)
        .await?
        .ok_or_else(|| CollegeError::not_found("Attendance record not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        record,
        "Attendance updated successfully",
    )))
}
