use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::GradeService;
use crate::utils::{RequestContext, SafeIDI64};

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_grades(user, ctx, &req).await
}

pub async fn gpa(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.gpa(user, ctx, &req).await
}

pub async fn course_sheet(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.course_sheet(user, course_id.0, &req).await
}

pub async fn distribution(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.distribution(user, course_id.0, &req).await
}

pub async fn assignment_breakdown(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .assignment_breakdown(user, course_id.0, ctx, &req)
        .await
}

pub async fn record_grades(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .record_grades(user, course_id.0, ctx, &req)
        .await
}

// 配置路由，"/gpa" 需在 "/{id}" 之前注册
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/grades")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_grades))
            .route("/gpa", web::get().to(gpa))
            .route("/{id}", web::get().to(course_sheet))
            .route("/{id}", web::post().to(record_grades))
            .route("/{id}/distribution", web::get().to(distribution))
            .route("/{id}/assignments", web::get().to(assignment_breakdown))
            .default_service(web::to(super::method_not_allowed)),
    );
}
