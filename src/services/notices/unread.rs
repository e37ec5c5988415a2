use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoticeService;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, notices::responses::UnreadCountResponse};
use crate::services::access::notice_audience;

pub async fn unread_count(
    service: &NoticeService,
    CurrentUser(user): CurrentUser,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let audience = notice_audience(storage.as_ref(), &user).await?;
    let unread = storage
        .count_unread_notices(audience, user.id, chrono::Utc::now().timestamp())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UnreadCountResponse { unread },
        "Unread count retrieved successfully",
    )))
}
