use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::warn;

use super::UserService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, users::Permission};
use crate::services::access::require_permission;

pub async fn delete_user(
    service: &UserService,
    CurrentUser(user): CurrentUser,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::DeleteUser)?;

    if user.id == user_id {
        return Err(CollegeError::validation("You cannot delete your own account").into());
    }

    // 会话、档案、选课、提交、考勤、已读回执一并删除
    if !storage.delete_user(user_id).await? {
        return Err(CollegeError::not_found("User not found").into());
    }

    warn!("User {} deleted by admin {}", user_id, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
}
