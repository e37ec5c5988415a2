pub mod breakdown;
pub mod distribution;
pub mod gpa;
pub mod list;
pub mod record;
pub mod sheet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::middlewares::CurrentUser;
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 成绩列表
    pub async fn list_grades(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, user, ctx, request).await
    }

    // GPA
    pub async fn gpa(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        gpa::student_gpa(self, user, ctx, request).await
    }

    // 课程成绩单
    pub async fn course_sheet(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        sheet::course_sheet(self, user, course_id, request).await
    }

    // 成绩分布
    pub async fn distribution(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        distribution::course_distribution(self, user, course_id, request).await
    }

    // 作业得分明细
    pub async fn assignment_breakdown(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        breakdown::assignment_breakdown(self, user, course_id, ctx, request).await
    }

    // 批量录入成绩
    pub async fn record_grades(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        record::record_grades(self, user, course_id, ctx, request).await
    }
}
