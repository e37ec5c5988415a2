use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::services::CourseService;
use crate::utils::{RequestContext, SafeIDI64};

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(user, ctx, &req).await
}

pub async fn create_course(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.create_course(user, ctx, &req).await
}

pub async fn get_course(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(user, course_id.0, &req).await
}

pub async fn update_course(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_course(user, course_id.0, ctx, &req)
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(user, course_id.0, &req).await
}

pub async fn list_students(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_students(user, course_id.0, &req).await
}

pub async fn enroll(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.enroll(user, course_id.0, ctx, &req).await
}

pub async fn drop_enrollment(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .drop_enrollment(user, course_id.0, ctx, &req)
        .await
}

pub async fn list_materials(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_materials(user, course_id.0, &req).await
}

pub async fn add_material(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_material(user, course_id.0, ctx, &req)
        .await
}

pub async fn list_schedule(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_schedule(user, course_id.0, &req).await
}

pub async fn add_schedule_slot(
    req: HttpRequest,
    user: CurrentUser,
    course_id: SafeIDI64,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .add_schedule_slot(user, course_id.0, ctx, &req)
        .await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/courses")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_courses))
            .route("", web::post().to(create_course))
            .route("/{id}", web::get().to(get_course))
            .route("/{id}", web::put().to(update_course))
            .route("/{id}", web::delete().to(delete_course))
            .route("/{id}/students", web::get().to(list_students))
            .route("/{id}/enroll", web::post().to(enroll))
            .route("/{id}/enroll", web::delete().to(drop_enrollment))
            .route("/{id}/materials", web::get().to(list_materials))
            .route("/{id}/materials", web::post().to(add_material))
            .route("/{id}/schedule", web::get().to(list_schedule))
            .route("/{id}/schedule", web::post().to(add_schedule_slot))
            .default_service(web::to(super::method_not_allowed)),
    );
}
