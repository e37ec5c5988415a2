use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::AuthService;
use crate::utils::RequestContext;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(req: HttpRequest, ctx: RequestContext) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(ctx, &req).await
}

pub async fn logout(req: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&req).await
}

pub async fn forgot_password(req: HttpRequest, ctx: RequestContext) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.forgot_password(ctx, &req).await
}

pub async fn reset_password(req: HttpRequest, ctx: RequestContext) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.reset_password(ctx, &req).await
}

pub async fn register(req: HttpRequest, ctx: RequestContext) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(ctx, &req).await
}

pub async fn me(req: HttpRequest, user: CurrentUser) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(user, &req).await
}

pub async fn change_password(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.change_password(user, ctx, &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/login", web::post().to(login))
            .route("/logout", web::post().to(logout))
            .route("/forgot-password", web::post().to(forgot_password))
            .route("/reset-password", web::post().to(reset_password))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireSession)
                    .route("/register", web::post().to(register))
                    .route("/me", web::get().to(me))
                    .route("/change-password", web::post().to(change_password))
                    .default_service(web::to(super::method_not_allowed)),
            ),
    );
}
