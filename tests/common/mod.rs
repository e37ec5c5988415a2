#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use serde_json::Value;

use rust_college_system::config::DatabaseConfig;
use rust_college_system::models::auth::requests::NewSession;
use rust_college_system::models::users::entities::{User, UserType};
use rust_college_system::models::users::requests::{CreateUserRequest, ProfileFields};
use rust_college_system::routes;
use rust_college_system::storage::{SeaOrmStorage, Storage};
use rust_college_system::utils::password::hash_password;
use rust_college_system::utils::token::generate_token;

pub const PASSWORD: &str = "Passw0rd!";

/// 单连接的内存 SQLite，已执行迁移
pub async fn storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory storage");
    Arc::new(storage)
}

/// 挂载全部 API 路由
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(routes::configure_health_routes)
        .configure(routes::configure_auth_routes)
        .configure(routes::configure_user_routes)
        .configure(routes::configure_department_routes)
        .configure(routes::configure_course_routes)
        .configure(routes::configure_assignment_routes)
        .configure(routes::configure_attendance_routes)
        .configure(routes::configure_grade_routes)
        .configure(routes::configure_notice_routes);
}

pub async fn create_user(storage: &Arc<dyn Storage>, email: &str, user_type: UserType) -> User {
    storage
        .create_user(CreateUserRequest {
            full_name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: hash_password(PASSWORD).expect("hash"),
            user_type,
            phone: None,
            profile: ProfileFields::default(),
        })
        .await
        .expect("create user")
}

/// 直接写入会话，返回 Bearer 令牌
pub async fn session_with_expiry(storage: &Arc<dyn Storage>, user_id: i64, expires_at: i64) -> String {
    let token = generate_token();
    storage
        .create_session(NewSession {
            token: token.clone(),
            user_id,
            expires_at,
            ip_address: None,
            user_agent: None,
        })
        .await
        .expect("create session");
    token
}

pub async fn session(storage: &Arc<dyn Storage>, user_id: i64) -> String {
    session_with_expiry(storage, user_id, chrono::Utc::now().timestamp() + 3600).await
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// 发送请求并返回状态码与 JSON 响应体
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn id_of(body: &Value) -> i64 {
    body["data"]["id"].as_i64().expect("response carries data.id")
}
