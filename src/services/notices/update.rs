use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NoticeService, check_attachments, ensure_notice_owner, load_notice};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    notices::requests::{NoticeChanges, UpdateNoticeRequest},
};
use crate::utils::RequestContext;
use crate::utils::time::parse_datetime;

pub async fn update_notice(
    service: &NoticeService,
    CurrentUser(user): CurrentUser,
    notice_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let notice = load_notice(storage.as_ref(), notice_id).await?;
    ensure_notice_owner(&user, &notice)?;

    let update: UpdateNoticeRequest = ctx.parse_update(UpdateNoticeRequest::FIELDS)?;

    if let Some(ref title) = update.title
        && title.trim().is_empty()
    {
        return Err(CollegeError::validation("title cannot be empty").into());
    }
    if let Some(ref attachments) = update.attachments {
        check_attachments(attachments)?;
    }
    let expiry_date = match update.expiry_date.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(Some(parse_datetime(value)?.timestamp())),
        // 传 null 或空字符串表示取消过期时间
        _ if ctx.is_blank("expiry_date") => Some(None),
        _ => None,
    };

    // 提供附件时整体替换，和公告更新在同一事务中
    let updated = storage
        .update_notice(
            notice_id,
            NoticeChanges {
                title: update.title.map(|t| t.trim().to_string()),
                content: update.content,
                expiry_date,
                attachments: update.attachments,
            },
        )
        .await?
        .ok_or_else(|| CollegeError::not_found("Notice not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        updated,
        "Notice updated successfully",
    )))
}
