use serde::Deserialize;

use super::entities::{UserStatus, UserType};
use crate::models::common::serde_helpers::{deserialize_option_i32, deserialize_option_i64};

// 用户列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListQuery {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub size: Option<i64>,
    pub user_type: Option<UserType>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub department_id: Option<i64>,
    pub search: Option<String>,
}

// 新建用户（密码已哈希）
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub phone: Option<String>,
    pub profile: ProfileFields,
}

// 档案字段，按用户类型取用
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFields {
    #[serde(default, deserialize_with = "deserialize_option_i64")]
    pub department_id: Option<i64>,
    pub roll_number: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_i32")]
    pub semester: Option<i32>,
    pub batch: Option<String>,
    pub designation: Option<String>,
    pub specialization: Option<String>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.department_id.is_none()
            && self.roll_number.is_none()
            && self.semester.is_none()
            && self.batch.is_none()
            && self.designation.is_none()
            && self.specialization.is_none()
    }
}

// 更新用户请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub status: Option<UserStatus>,
    #[serde(flatten)]
    pub profile: ProfileFields,
}

impl UpdateUserRequest {
    /// 可由本人修改的字段
    pub const SELF_FIELDS: &'static [&'static str] = &[
        "full_name",
        "phone",
        "semester",
        "batch",
        "designation",
        "specialization",
    ];

    /// 管理员额外可修改的字段
    pub const ADMIN_FIELDS: &'static [&'static str] = &[
        "full_name",
        "phone",
        "semester",
        "batch",
        "designation",
        "specialization",
        "status",
        "email",
        "department_id",
        "roll_number",
    ];
}
