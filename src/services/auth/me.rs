use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, users::responses::UserResponse};

use super::AuthService;

pub async fn handle_me(
    service: &AuthService,
    CurrentUser(user): CurrentUser,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let profile = storage.get_user_profile(user.id, user.user_type).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse { user, profile },
        "User information retrieved successfully",
    )))
}
