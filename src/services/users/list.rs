use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::config::AppConfig;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    users::{Permission, entities::UserType, requests::UserListQuery},
};
use crate::services::access::require_permission;
use crate::utils::RequestContext;

pub async fn list_users(
    service: &UserService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::ListUsers)?;

    let mut query: UserListQuery = ctx.parse()?;
    let (page, size) = AppConfig::get().clamp_pagination(query.page, query.size);

    // 教师只能看到学生
    if user.user_type.is_faculty() {
        query.user_type = Some(UserType::Student);
    }

    let response = storage
        .list_users_with_pagination(query, page, size)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Users retrieved successfully",
    )))
}
