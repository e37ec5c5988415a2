use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::CourseService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;
use crate::services::access::{ensure_course_manager, load_course};

pub async fn delete_course(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    // 选课、考勤、作业及提交、资料、课表、课程公告在同一事务中删除
    if !storage.delete_course(course_id).await? {
        return Err(CollegeError::not_found("Course not found").into());
    }

    warn!("Course {} deleted by user {}", course.code, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course deleted successfully")))
}
