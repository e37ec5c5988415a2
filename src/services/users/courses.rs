use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::config::AppConfig;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse, PaginationInfo,
    courses::{
        requests::{CourseListQuery, CourseScope},
        responses::CourseListResponse,
    },
    users::entities::UserType,
};
use crate::services::access::ensure_self_or_admin;
use crate::utils::RequestContext;

/// 学生返回已选课程，教师返回所授课程
pub async fn list_user_courses(
    service: &UserService,
    CurrentUser(user): CurrentUser,
    user_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    ensure_self_or_admin(&user, user_id)?;

    let target = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("User not found"))?;

    let query: CourseListQuery = ctx.parse()?;
    let (page, size) = AppConfig::get().clamp_pagination(query.page, query.size);

    let response = match target.user_type {
        UserType::Student => {
            storage
                .list_courses_with_pagination(CourseScope::EnrolledBy(target.id), query, page, size)
                .await?
        }
        UserType::Faculty => {
            storage
                .list_courses_with_pagination(CourseScope::TaughtBy(target.id), query, page, size)
                .await?
        }
        UserType::Admin => CourseListResponse {
            items: Vec::new(),
            pagination: PaginationInfo::new(page, size, 0, 0),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Courses retrieved successfully",
    )))
}
