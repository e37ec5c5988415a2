use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::services::access::{ensure_course_manager, load_course};

pub async fn list_students(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    let students = storage.list_course_students(course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        students,
        "Students retrieved successfully",
    )))
}
