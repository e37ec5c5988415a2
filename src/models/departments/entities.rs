use serde::Serialize;

// 院系
#[derive(Debug, Clone, Serialize)]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
