use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::models::{ApiResponse, AppStartTime};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: i64,
}

// 存活探针，不经过会话校验
pub async fn health(start: Option<web::Data<AppStartTime>>) -> HttpResponse {
    let uptime_seconds = start
        .map(|s| {
            chrono::Utc::now()
                .signed_duration_since(s.start_datetime)
                .num_seconds()
        })
        .unwrap_or(0);

    HttpResponse::Ok().json(ApiResponse::success(
        HealthStatus {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds,
        },
        "Service is healthy",
    ))
}

pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}
