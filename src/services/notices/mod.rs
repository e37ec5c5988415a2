pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod unread;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::notices::{entities::Notice, requests::AttachmentInput};
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct NoticeService {
    storage: Option<Arc<dyn Storage>>,
}

impl NoticeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 公告列表
    pub async fn list_notices(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_notices(self, user, ctx, request).await
    }

    // 公告详情，同时记录已读
    pub async fn get_notice(
        &self,
        user: CurrentUser,
        notice_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_notice(self, user, notice_id, request).await
    }

    // 发布公告
    pub async fn create_notice(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_notice(self, user, ctx, request).await
    }

    // 修改公告
    pub async fn update_notice(
        &self,
        user: CurrentUser,
        notice_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_notice(self, user, notice_id, ctx, request).await
    }

    // 删除公告
    pub async fn delete_notice(
        &self,
        user: CurrentUser,
        notice_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_notice(self, user, notice_id, request).await
    }

    // 未读数量
    pub async fn unread_count(
        &self,
        user: CurrentUser,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        unread::unread_count(self, user, request).await
    }
}

pub(crate) async fn load_notice(storage: &dyn Storage, notice_id: i64) -> Result<Notice> {
    storage
        .get_notice_by_id(notice_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Notice not found"))
}

/// 发布者或管理员
pub(crate) fn ensure_notice_owner(user: &User, notice: &Notice) -> Result<()> {
    if user.user_type.is_admin() || notice.created_by == user.id {
        Ok(())
    } else {
        Err(CollegeError::authorization(
            "Only the author or an administrator can modify this notice",
        ))
    }
}

pub(crate) fn check_attachments(attachments: &[AttachmentInput]) -> Result<()> {
    for (i, a) in attachments.iter().enumerate() {
        if a.file_name.trim().is_empty() || a.file_path.trim().is_empty() {
            return Err(CollegeError::validation(format!(
                "attachments[{i}] requires file_name and file_path"
            )));
        }
    }
    Ok(())
}
