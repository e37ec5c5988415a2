use serde::Serialize;

use super::entities::{User, UserProfile};
use crate::models::PaginationInfo;

// 用户信息及档案
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: User,
    pub profile: Option<UserProfile>,
}

// 用户列表响应
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub pagination: PaginationInfo,
}
