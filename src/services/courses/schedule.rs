use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, courses::requests::CreateScheduleRequest};
use crate::services::access::{ensure_course_manager, ensure_course_reader, load_course};
use crate::utils::RequestContext;
use crate::utils::validate::validate_time_of_day;

pub async fn list_schedule(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_reader(storage.as_ref(), &user, &course).await?;

    let slots = storage.list_course_schedule(course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        slots,
        "Schedule retrieved successfully",
    )))
}

/// 星期 0-6，HH:MM 且开始早于结束
fn validate_slot(slot: &CreateScheduleRequest) -> Result<()> {
    if !(0..=6).contains(&slot.day_of_week) {
        return Err(CollegeError::validation(
            "day_of_week must be between 0 (Monday) and 6 (Sunday)",
        ));
    }
    validate_time_of_day(&slot.start_time).map_err(CollegeError::validation)?;
    validate_time_of_day(&slot.end_time).map_err(CollegeError::validation)?;
    // 固定宽度的 HH:MM 可以直接按字符串比较
    if slot.start_time >= slot.end_time {
        return Err(CollegeError::validation("start_time must be before end_time"));
    }
    Ok(())
}

pub async fn add_schedule_slot(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    let mut req: CreateScheduleRequest =
        ctx.parse_required(&["day_of_week", "start_time", "end_time"])?;
    req.start_time = req.start_time.trim().to_string();
    req.end_time = req.end_time.trim().to_string();
    validate_slot(&req)?;

    let slot = storage.create_schedule_slot(course_id, req).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        slot,
        "Schedule slot added successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(day: i32, start: &str, end: &str) -> CreateScheduleRequest {
        CreateScheduleRequest {
            day_of_week: day,
            start_time: start.into(),
            end_time: end.into(),
            room: None,
        }
    }

    #[test]
    fn test_validate_slot() {
        assert!(validate_slot(&slot(0, "09:00", "10:30")).is_ok());
        assert!(validate_slot(&slot(7, "09:00", "10:30")).is_err());
        assert!(validate_slot(&slot(2, "10:30", "09:00")).is_err());
        assert!(validate_slot(&slot(2, "9:00", "10:00")).is_err());
        assert!(validate_slot(&slot(6, "12:00", "12:00")).is_err());
    }
}
