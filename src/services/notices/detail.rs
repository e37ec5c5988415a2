use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NoticeService, load_notice};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, notices::responses::NoticeDetail};
use crate::services::access::notice_audience;

pub async fn get_notice(
    service: &NoticeService,
    CurrentUser(user): CurrentUser,
    notice_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let notice = load_notice(storage.as_ref(), notice_id).await?;

    let audience = notice_audience(storage.as_ref(), &user).await?;
    if !audience.can_see(&notice) {
        return Err(CollegeError::authorization(
            "You do not have permission to view this notice",
        )
        .into());
    }

    // 过期公告只对管理员和发布者可见
    if notice.is_expired(chrono::Utc::now())
        && !user.user_type.is_admin()
        && notice.created_by != user.id
    {
        return Err(CollegeError::not_found("Notice not found").into());
    }

    // 已存在的回执不会重复写入
    storage.mark_notice_read(notice.id, user.id).await?;

    let attachments = storage.list_notice_attachments(notice.id).await?;
    let read_count = storage.count_notice_reads(notice.id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        NoticeDetail {
            notice,
            attachments,
            read_count,
        },
        "Notice retrieved successfully",
    )))
}
