use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, auth::requests::ChangePasswordRequest};
use crate::utils::RequestContext;
use crate::utils::password::{hash_password, verify_password};

use super::{AuthService, check_password_policy};

pub async fn handle_change_password(
    service: &AuthService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let req: ChangePasswordRequest =
        ctx.parse_required(&["current_password", "new_password"])?;

    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(CollegeError::authentication("Current password is incorrect").into());
    }

    check_password_policy(&req.new_password)?;
    let password_hash = hash_password(&req.new_password)?;

    if !storage.update_password(user.id, &password_hash).await? {
        return Err(CollegeError::not_found("User not found").into());
    }

    info!("User {} changed password", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Password changed successfully",
    )))
}
