use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, CurrentUser};
use crate::models::users::Permission;
use crate::services::DepartmentService;
use crate::utils::RequestContext;

// 懒加载的全局 DepartmentService 实例
static DEPARTMENT_SERVICE: Lazy<DepartmentService> = Lazy::new(DepartmentService::new_lazy);

pub async fn list_departments(req: HttpRequest) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.list_departments(&req).await
}

pub async fn create_department(
    req: HttpRequest,
    user: CurrentUser,
    ctx: RequestContext,
) -> ActixResult<HttpResponse> {
    DEPARTMENT_SERVICE.create_department(user, ctx, &req).await
}

// 配置路由
pub fn configure_department_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/departments")
            .wrap(middlewares::RequireSession)
            .route("", web::get().to(list_departments))
            .route(
                "",
                web::post()
                    .to(create_department)
                    .wrap(middlewares::RequireRole::new(Permission::ManageDepartments)),
            )
            .default_service(web::to(super::method_not_allowed)),
    );
}
