use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, courses::responses::CourseDetail};
use crate::services::access::{ensure_course_reader, load_course};

pub async fn get_course(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_reader(storage.as_ref(), &user, &course).await?;

    let instructor_name = match course.instructor_id {
        Some(id) => storage.get_user_by_id(id).await?.map(|u| u.full_name),
        None => None,
    };
    let enrolled_count = storage.count_enrollments(course.id).await?;
    let schedule = storage.list_course_schedule(course.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetail {
            course,
            instructor_name,
            enrolled_count,
            schedule,
        },
        "Course retrieved successfully",
    )))
}
