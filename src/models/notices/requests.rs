use serde::Deserialize;

use crate::models::common::serde_helpers::{deserialize_option_bool, deserialize_option_i64};

// 公告列表查询
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeListQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub size: Option<i64>,
    pub notice_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_bool")]
    pub include_expired: Option<bool>,
}

// 附件输入
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentInput {
    pub file_name: String,
    pub file_path: String,
}

// 发布公告
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoticeRequest {
    pub title: String,
    pub content: String,
    pub notice_type: String,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub department_id: Option<i64>,
    pub expiry_date: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentInput>,
}

// 修改公告
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoticeRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub expiry_date: Option<String>,
    pub attachments: Option<Vec<AttachmentInput>>,
}

impl UpdateNoticeRequest {
    pub const FIELDS: &'static [&'static str] = &["title", "content", "expiry_date", "attachments"];
}

// 写入存储的新公告
#[derive(Debug, Clone)]
pub struct NewNotice {
    pub title: String,
    pub content: String,
    pub notice_type: String,
    pub course_id: Option<i64>,
    pub department_id: Option<i64>,
    pub created_by: i64,
    pub expiry_date: Option<i64>,
    pub attachments: Vec<AttachmentInput>,
}

// 写入存储的公告变更
#[derive(Debug, Clone, Default)]
pub struct NoticeChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` 表示清除过期时间
    pub expiry_date: Option<Option<i64>>,
    pub attachments: Option<Vec<AttachmentInput>>,
}

// 存储层的列表过滤条件
#[derive(Debug, Clone)]
pub struct NoticeFilter {
    pub page: u64,
    pub size: u64,
    pub notice_type: Option<String>,
    pub include_expired: bool,
    pub now: i64,
}
