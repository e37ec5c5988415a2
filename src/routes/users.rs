use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::UserService;
use crate::utils::{RequestContext, SafeIDI64};

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(user, ctx, &req).await
}

pub async fn get_user(
    req: HttpRequest,
    user: CurrentUser,
    user_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user, user_id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    user: CurrentUser,
    user_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.update_user(user, user_id.0, ctx, &req).await
}

pub async fn delete_user(
    req: HttpRequest,
    user: CurrentUser,
    user_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user, user_id.0, &req).await
}

pub async fn list_user_courses(
    req: HttpRequest,
    user: CurrentUser,
    user_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .list_user_courses(user, user_id.0, ctx, &req)
        .await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/users")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_users))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}", web::put().to(update_user))
            .route("/{id}", web::delete().to(delete_user))
            .route("/{id}/courses", web::get().to(list_user_courses))
            .default_service(web::to(super::method_not_allowed)),
    );
}
