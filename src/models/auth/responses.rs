use serde::Serialize;

use crate::models::users::entities::{User, UserProfile};

// 登录响应
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub user: User,
    pub profile: Option<UserProfile>,
}
