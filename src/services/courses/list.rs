use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::config::AppConfig;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    courses::requests::{CourseListQuery, CourseScope},
    users::entities::UserType,
};
use crate::utils::RequestContext;

pub async fn list_courses(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let query: CourseListQuery = ctx.parse()?;
    let (page, size) = AppConfig::get().clamp_pagination(query.page, query.size);

    // 管理员看全部，教师看所授课程，学生看已选课程
    let scope = match user.user_type {
        UserType::Admin => CourseScope::All,
        UserType::Faculty => CourseScope::TaughtBy(user.id),
        UserType::Student => CourseScope::EnrolledBy(user.id),
    };

    let response = storage
        .list_courses_with_pagination(scope, query, page, size)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Courses retrieved successfully",
    )))
}
