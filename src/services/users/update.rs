use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    users::{requests::UpdateUserRequest, responses::UserResponse},
};
use crate::services::access::ensure_self_or_admin;
use crate::services::auth::normalize_email;
use crate::utils::RequestContext;
use crate::utils::validate::validate_email;

pub async fn update_user(
    service: &UserService,
    CurrentUser(user): CurrentUser,
    user_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    ensure_self_or_admin(&user, user_id)?;

    let is_admin = user.user_type.is_admin();

    // 非管理员提交了仅管理员可改的字段
    if !is_admin {
        let restricted: Vec<&str> = UpdateUserRequest::ADMIN_FIELDS
            .iter()
            .copied()
            .filter(|f| !UpdateUserRequest::SELF_FIELDS.contains(f) && ctx.has(f))
            .collect();
        if !restricted.is_empty() {
            return Err(CollegeError::authorization(format!(
                "Only administrators may change: {}",
                restricted.join(", ")
            ))
            .into());
        }
    }

    let allowed = if is_admin {
        UpdateUserRequest::ADMIN_FIELDS
    } else {
        UpdateUserRequest::SELF_FIELDS
    };
    let mut update: UpdateUserRequest = ctx.parse_update(allowed)?;

    if let Some(ref full_name) = update.full_name
        && full_name.trim().is_empty()
    {
        return Err(CollegeError::validation("full_name cannot be empty").into());
    }

    if let Some(email) = update.email.take() {
        let email = normalize_email(&email);
        validate_email(&email).map_err(CollegeError::validation)?;
        update.email = Some(email);
    }

    let updated = storage
        .update_user(user_id, update)
        .await?
        .ok_or_else(|| CollegeError::not_found("User not found"))?;

    let profile = storage
        .get_user_profile(updated.id, updated.user_type)
        .await?;

    info!("User {} updated by {}", updated.id, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse {
            user: updated,
            profile,
        },
        "User updated successfully",
    )))
}
