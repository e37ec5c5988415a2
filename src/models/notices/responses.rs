use serde::Serialize;

use super::entities::{Notice, NoticeAttachment};
use crate::models::PaginationInfo;

// 列表中的公告，附带调用者的已读状态
#[derive(Debug, Clone, Serialize)]
pub struct NoticeListItem {
    #[serde(flatten)]
    pub notice: Notice,
    pub is_read: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticeListResponse {
    pub items: Vec<NoticeListItem>,
    pub pagination: PaginationInfo,
}

// 公告详情
#[derive(Debug, Clone, Serialize)]
pub struct NoticeDetail {
    #[serde(flatten)]
    pub notice: Notice,
    pub attachments: Vec<NoticeAttachment>,
    pub read_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub unread: u64,
}
