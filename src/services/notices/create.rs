use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{NoticeService, check_attachments};
use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    notices::{
        entities::NoticeType,
        requests::{CreateNoticeRequest, NewNotice},
    },
    users::{Permission, entities::User},
};
use crate::services::access::{ensure_course_manager, require_permission};
use crate::storage::Storage;
use crate::utils::RequestContext;
use crate::utils::time::parse_datetime;

/// 按公告类型检查目标并返回规整后的 (course_id, department_id)
async fn resolve_target(
    storage: &dyn Storage,
    user: &User,
    notice_type: NoticeType,
    req: &CreateNoticeRequest,
) -> Result<(Option<i64>, Option<i64>)> {
    match notice_type {
        NoticeType::General => {
            require_permission(user, Permission::PostGeneralNotice)?;
            Ok((None, None))
        }
        NoticeType::Course => {
            let course_id = req.course_id.ok_or_else(|| {
                CollegeError::validation("course_id is required for course notices")
            })?;
            let course = storage
                .get_course_by_id(course_id)
                .await?
                .ok_or_else(|| CollegeError::validation(format!("Course {course_id} does not exist")))?;
            ensure_course_manager(user, &course)?;
            Ok((Some(course_id), None))
        }
        NoticeType::Department => {
            let department_id = req.department_id.ok_or_else(|| {
                CollegeError::validation("department_id is required for department notices")
            })?;
            if storage.get_department_by_id(department_id).await?.is_none() {
                return Err(CollegeError::validation(format!(
                    "Department {department_id} does not exist"
                )));
            }
            if !user.user_type.is_admin() {
                let own = storage
                    .get_user_profile(user.id, user.user_type)
                    .await?
                    .and_then(|p| p.department_id());
                if own != Some(department_id) {
                    return Err(CollegeError::authorization(
                        "You can only post notices to your own department",
                    ));
                }
            }
            Ok((None, Some(department_id)))
        }
    }
}

pub async fn create_notice(
    service: &NoticeService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::PostNotice)?;

    let req: CreateNoticeRequest = ctx.parse_required(&["title", "content", "notice_type"])?;
    let notice_type: NoticeType = req
        .notice_type
        .trim()
        .parse()
        .map_err(CollegeError::validation)?;

    let (course_id, department_id) =
        resolve_target(storage.as_ref(), &user, notice_type, &req).await?;

    let expiry_date = match req.expiry_date.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(parse_datetime(value)?.timestamp()),
        _ => None,
    };
    check_attachments(&req.attachments)?;

    // 公告和附件在同一事务中写入
    let notice = storage
        .create_notice(NewNotice {
            title: req.title.trim().to_string(),
            content: req.content,
            notice_type: notice_type.to_string(),
            course_id,
            department_id,
            created_by: user.id,
            expiry_date,
            attachments: req.attachments,
        })
        .await?;

    info!(
        "Notice {} ({}) posted by user {}",
        notice.id, notice.notice_type, user.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        notice,
        "Notice created successfully",
    )))
}
