use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::requests::RegisterRequest,
    users::{
        Permission,
        entities::UserType,
        requests::CreateUserRequest,
        responses::UserResponse,
    },
};
use crate::services::access::require_permission;
use crate::utils::RequestContext;
use crate::utils::password::hash_password;
use crate::utils::validate::validate_email;

use super::{AuthService, check_password_policy, normalize_email};

pub async fn handle_register(
    service: &AuthService,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let current = CurrentUser::from_request_sync(request)?;
    require_permission(&current, Permission::RegisterUser)?;

    let req: RegisterRequest =
        ctx.parse_required(&["full_name", "email", "password", "user_type"])?;

    let user_type: UserType = req
        .user_type
        .trim()
        .parse()
        .map_err(CollegeError::validation)?;

    let email = normalize_email(&req.email);
    validate_email(&email).map_err(CollegeError::validation)?;
    check_password_policy(&req.password)?;

    if storage.get_user_by_email(&email).await?.is_some() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AlreadyExists,
            "Email already registered",
        )));
    }

    let password_hash = hash_password(&req.password)?;

    // 用户和档案在同一事务中写入
    let user = storage
        .create_user(CreateUserRequest {
            full_name: req.full_name.trim().to_string(),
            email,
            password_hash,
            user_type,
            phone: req.phone,
            profile: req.profile,
        })
        .await?;

    let profile = storage.get_user_profile(user.id, user.user_type).await?;

    info!(
        "User {} ({}) registered by admin {}",
        user.email, user.user_type, current.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        UserResponse { user, profile },
        "User registered successfully",
    )))
}
