use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NoticeService;
use crate::config::AppConfig;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    notices::{
        entities::NoticeType,
        requests::{NoticeFilter, NoticeListQuery},
    },
};
use crate::services::access::notice_audience;
use crate::utils::RequestContext;

pub async fn list_notices(
    service: &NoticeService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query: NoticeListQuery = ctx.parse()?;
    let (page, size) = AppConfig::get().clamp_pagination(query.page, query.size);

    let notice_type = match query.notice_type.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => Some(
            t.parse::<NoticeType>()
                .map_err(CollegeError::validation)?
                .to_string(),
        ),
        _ => None,
    };

    // 只有管理员可以查看已过期的公告
    let include_expired = user.user_type.is_admin() && query.include_expired.unwrap_or(false);

    let audience = notice_audience(storage.as_ref(), &user).await?;
    let filter = NoticeFilter {
        page,
        size,
        notice_type,
        include_expired,
        now: chrono::Utc::now().timestamp(),
    };

    let response = storage
        .list_notices_with_pagination(audience, filter, user.id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Notices retrieved successfully",
    )))
}
