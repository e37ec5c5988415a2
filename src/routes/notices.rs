use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::NoticeService;
use crate::utils::{RequestContext, SafeIDI64};

// 懒加载的全局 NoticeService 实例
static NOTICE_SERVICE: Lazy<NoticeService> = Lazy::new(NoticeService::new_lazy);

pub async fn list_notices(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.list_notices(user, ctx, &req).await
}

pub async fn create_notice(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.create_notice(user, ctx, &req).await
}

pub async fn unread_count(req: HttpRequest, user: CurrentUser) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.unread_count(user, &req).await
}

pub async fn get_notice(
    req: HttpRequest,
    user: CurrentUser,
    notice_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.get_notice(user, notice_id.0, &req).await
}

pub async fn update_notice(
    req: HttpRequest,
    user: CurrentUser,
    notice_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE
        .update_notice(user, notice_id.0, ctx, &req)
        .await
}

pub async fn delete_notice(
    req: HttpRequest,
    user: CurrentUser,
    notice_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    NOTICE_SERVICE.delete_notice(user, notice_id.0, &req).await
}

// 配置路由，"/unread-count" 需在 "/{id}" 之前注册
pub fn configure_notice_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notices")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_notices))
            .route("", web::post().to(create_notice))
            .route("/unread-count", web::get().to(unread_count))
            .route("/{id}", web::get().to(get_notice))
            .route("/{id}", web::put().to(update_notice))
            .route("/{id}", web::delete().to(delete_notice))
            .default_service(web::to(super::method_not_allowed)),
    );
}
