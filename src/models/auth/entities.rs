use serde::Serialize;

// 登录会话
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= chrono::Utc::now()
    }
}

// 密码重置令牌
#[derive(Debug, Clone)]
pub struct PasswordReset {
    pub user_id: i64,
    pub token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}
