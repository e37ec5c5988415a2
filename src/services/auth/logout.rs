use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{debug, warn};

use crate::middlewares::require_session::bearer_token;
use crate::models::ApiResponse;

use super::AuthService;

/// 尽力删除当前令牌对应的会话，无论结果如何都返回 200
pub async fn handle_logout(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(token) = bearer_token(request.headers()) {
        match service.get_storage(request) {
            Ok(storage) => match storage.delete_session(token).await {
                Ok(removed) => debug!("Logout removed session: {}", removed),
                Err(e) => warn!("Failed to delete session on logout: {}", e),
            },
            Err(e) => warn!("Logout skipped session removal: {}", e),
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Logged out successfully")))
}
