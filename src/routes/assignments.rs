use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::AssignmentService;
use crate::utils::{RequestContext, SafeIDI64};

// 懒加载的全局 AssignmentService 实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.list_assignments(user, ctx, &req).await
}

pub async fn create_assignment(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.create_assignment(user, ctx, &req).await
}

pub async fn get_assignment(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(user, assignment_id.0, &req)
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(user, assignment_id.0, ctx, &req)
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(user, assignment_id.0, &req)
        .await
}

pub async fn submit(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .submit(user, assignment_id.0, ctx, &req)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_submissions(user, assignment_id.0, &req)
        .await
}

pub async fn get_submission(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_submission(user, assignment_id.0, ctx, &req)
        .await
}

pub async fn grade(
    req: HttpRequest,
    user: CurrentUser,
    assignment_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .grade(user, assignment_id.0, ctx, &req)
        .await
}

// 配置路由
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignments")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_assignments))
            .route("", web::post().to(create_assignment))
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}", web::put().to(update_assignment))
            .route("/{id}", web::delete().to(delete_assignment))
            .route("/{id}/submit", web::post().to(submit))
            .route("/{id}/submissions", web::get().to(list_submissions))
            .route("/{id}/submission", web::get().to(get_submission))
            .route("/{id}/grade", web::post().to(grade))
            .default_service(web::to(super::method_not_allowed)),
    );
}
