use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use crate::models::{ApiResponse, auth::requests::ForgotPasswordRequest};
use crate::utils::RequestContext;
use crate::utils::token::generate_token;

use super::{AuthService, normalize_email};

const GENERIC_MESSAGE: &str = "If the email exists, a password reset link has been sent";

/// 无论邮箱是否存在都返回相同的响应
pub async fn handle_forgot_password(
    service: &AuthService,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config();
    let req: ForgotPasswordRequest = ctx.parse_required(&["email"])?;

    if let Some(user) = storage.get_user_by_email(&normalize_email(&req.email)).await? {
        let token = generate_token();
        let expires_at = chrono::Utc::now()
            + chrono::Duration::minutes(config.session.reset_token_expiry_minutes);

        storage
            .upsert_password_reset(user.id, &token, expires_at.timestamp())
            .await?;

        // 邮件发送不在本服务内，令牌只写调试日志
        debug!("Password reset token for user {}: {}", user.id, token);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(GENERIC_MESSAGE)))
}
