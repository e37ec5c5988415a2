use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::AttendanceService;
use crate::utils::{RequestContext, SafeIDI64};

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn mark(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.mark(user, ctx, &req).await
}

pub async fn list(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list(user, ctx, &req).await
}

pub async fn summary(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.summary(user, ctx, &req).await
}

pub async fn update(
    req: HttpRequest,
    user: CurrentUser,
    record_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .update(user, record_id.0, ctx, &req)
        .await
}

pub async fn delete(
    req: HttpRequest,
    user: CurrentUser,
    record_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.delete(user, record_id.0, &req).await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/attendance")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list))
            .route("/mark", web::post().to(mark))
            .route("/summary", web::get().to(summary))
            .route("/{id}", web::put().to(update))
            .route("/{id}", web::delete().to(delete))
            .default_service(web::to(super::method_not_allowed)),
    );
}
