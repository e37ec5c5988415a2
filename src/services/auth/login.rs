use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header::USER_AGENT};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, requests::NewSession, responses::LoginResponse},
};
use crate::utils::RequestContext;
use crate::utils::password::verify_password;
use crate::utils::token::generate_token;

use super::{AuthService, normalize_email};

pub async fn handle_login(
    service: &AuthService,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();
    let login: LoginRequest = ctx.parse_required(&["email", "password"])?;

    // 1. 查找用户并验证密码
    let user = match storage.get_user_by_email(&normalize_email(&login.email)).await? {
        Some(user) if verify_password(&login.password, &user.password_hash) => user,
        _ => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::InvalidCredentials,
                "Invalid email or password",
            )));
        }
    };

    // 2. 停用账号不允许登录
    if !user.is_active() {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is inactive",
        )));
    }

    // 3. 创建会话
    let expires_at = chrono::Utc::now() + config.session_ttl();
    let session = storage
        .create_session(NewSession {
            token: generate_token(),
            user_id: user.id,
            expires_at: expires_at.timestamp(),
            ip_address: request
                .connection_info()
                .realip_remote_addr()
                .map(str::to_string),
            user_agent: request
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        })
        .await?;

    // 4. 更新最后登录时间
    storage.update_last_login(user.id).await?;

    let profile = storage.get_user_profile(user.id, user.user_type).await?;

    info!("User {} logged in successfully", user.email);

    let response = LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user,
        profile,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}
