use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{ApiResponse, ErrorCode, auth::requests::ResetPasswordRequest};
use crate::utils::RequestContext;
use crate::utils::password::hash_password;

use super::{AuthService, check_password_policy};

pub async fn handle_reset_password(
    service: &AuthService,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let req: ResetPasswordRequest = ctx.parse_required(&["token", "password"])?;

    check_password_policy(&req.password)?;
    let password_hash = hash_password(&req.password)?;

    // 更新密码、删除重置令牌和该用户全部会话在同一事务中完成
    let now = chrono::Utc::now().timestamp();
    match storage
        .reset_password(req.token.trim(), &password_hash, now)
        .await?
    {
        Some(user_id) => {
            info!("Password reset completed for user {}", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password has been reset successfully",
            )))
        }
        None => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::InvalidResetToken,
            "Invalid or expired reset token",
        ))),
    }
}
