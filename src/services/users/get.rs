use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, users::responses::UserResponse};

pub async fn get_user(
    service: &UserService,
    CurrentUser(user): CurrentUser,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let target = storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("User not found"))?;

    // 本人、管理员，或教师查看学生
    let allowed = user.id == target.id
        || user.user_type.is_admin()
        || (user.user_type.is_faculty() && target.user_type.is_student());
    if !allowed {
        return Err(CollegeError::authorization(
            "You do not have permission to view this user",
        )
        .into());
    }

    let profile = storage.get_user_profile(target.id, target.user_type).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse {
            user: target,
            profile,
        },
        "User information retrieved successfully",
    )))
}
