pub mod delete;
pub mod list;
pub mod mark;
pub mod summary;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::attendance::entities::{AttendanceRecord, AttendanceStatus};
use crate::models::courses::entities::Course;
use crate::services::access::load_course;
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

impl AttendanceService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 批量记考勤
    pub async fn mark(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, user, ctx, request).await
    }

    // 考勤记录
    pub async fn list(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_attendance(self, user, ctx, request).await
    }

    // 出勤统计
    pub async fn summary(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::attendance_summary(self, user, ctx, request).await
    }

    // 修改单条考勤
    pub async fn update(
        &self,
        user: CurrentUser,
        record_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_attendance(self, user, record_id, ctx, request).await
    }

    // 删除单条考勤
    pub async fn delete(
        &self,
        user: CurrentUser,
        record_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_attendance(self, user, record_id, request).await
    }
}

pub(crate) fn parse_status(value: &str) -> Result<AttendanceStatus> {
    value.trim().parse().map_err(CollegeError::validation)
}

/// 加载考勤记录及其课程
pub(crate) async fn load_record(
    storage: &dyn Storage,
    record_id: i64,
) -> Result<(AttendanceRecord, Course)> {
    let record = storage
        .get_attendance_by_id(record_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Attendance record not found"))?;
    let course = load_course(storage, record.course_id).await?;
    Ok((record, course))
}
