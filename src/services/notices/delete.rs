use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{NoticeService, ensure_notice_owner, load_notice};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::ApiResponse;

pub async fn delete_notice(
    service: &NoticeService,
    CurrentUser(user): CurrentUser,
    notice_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let notice = load_notice(storage.as_ref(), notice_id).await?;
    ensure_notice_owner(&user, &notice)?;

    if !storage.delete_notice(notice_id).await? {
        return Err(CollegeError::not_found("Notice not found").into());
    }

    info!("Notice {} deleted by user {}", notice_id, user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Notice deleted successfully")))
}
