use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, departments::requests::CreateDepartmentRequest};
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct DepartmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl DepartmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 院系列表
    pub async fn list_departments(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let departments = storage.list_departments().await?;

        Ok(HttpResponse::Ok().json(ApiResponse::success(
            departments,
            "Departments retrieved successfully",
        )))
    }

    // 新建院系，权限由路由上的 RequireRole 保证
    pub async fn create_department(
        &self,
        CurrentUser(user): CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        let req: CreateDepartmentRequest = ctx.parse_required(&["code", "name"])?;

        let code = req.code.trim();
        if storage.get_department_by_code(code).await?.is_some() {
            return Err(CollegeError::validation(format!(
                "Department code '{code}' already exists"
            ))
            .into());
        }

        let department = storage.create_department(code, req.name.trim()).await?;

        info!("Department {} created by admin {}", department.code, user.id);

        Ok(HttpResponse::Created().json(ApiResponse::success(
            department,
            "Department created successfully",
        )))
    }
}
