use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, load_record};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::services::access::ensure_course_manager;

pub async fn delete_attendance(
    service: &AttendanceService,
    CurrentUser(user): CurrentUser,
    record_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (_, course) = load_record(storage.as_ref(), record_id).await?;
    ensure_course_manager(&user, &course)?;

    if !storage.delete_attendance(record_id).await? {
        return Err(CollegeError::not_found("Attendance record not found").into());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Attendance record deleted successfully",
    )))
}
