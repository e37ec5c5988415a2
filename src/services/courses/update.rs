use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, check_department, check_instructor, check_positive};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, courses::requests::UpdateCourseRequest};
use crate::services::access::{ensure_course_manager, load_course};
use crate::utils::RequestContext;

pub async fn update_course(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    if !user.user_type.is_admin() && ctx.has("instructor_id") {
        return Err(CollegeError::authorization(
            "Only administrators may change the instructor",
        )
        .into());
    }

    let allowed = if user.user_type.is_admin() {
        UpdateCourseRequest::ADMIN_FIELDS
    } else {
        UpdateCourseRequest::OWNER_FIELDS
    };
    let update: UpdateCourseRequest = ctx.parse_update(allowed)?;

    if let Some(ref name) = update.name
        && name.trim().is_empty()
    {
        return Err(CollegeError::validation("name cannot be empty").into());
    }
    check_positive("credits", update.credits)?;
    check_positive("max_students", update.max_students)?;
    check_department(storage.as_ref(), update.department_id).await?;
    if let Some(instructor_id) = update.instructor_id {
        check_instructor(storage.as_ref(), instructor_id).await?;
    }

    let updated = storage
        .update_course(course_id, update)
        .await?
        .ok_or_else(|| CollegeError::not_found("Course not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Course updated successfully",
    )))
}
