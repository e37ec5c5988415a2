pub mod create;
pub mod delete;
pub mod detail;
pub mod enroll;
pub mod list;
pub mod materials;
pub mod schedule;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 课程列表
    pub async fn list_courses(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, user, ctx, request).await
    }

    // 课程详情
    pub async fn get_course(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_course(self, user, course_id, request).await
    }

    // 创建课程
    pub async fn create_course(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, user, ctx, request).await
    }

    // 更新课程
    pub async fn update_course(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, user, course_id, ctx, request).await
    }

    // 删除课程
    pub async fn delete_course(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, user, course_id, request).await
    }

    // 课程学生名单
    pub async fn list_students(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, user, course_id, request).await
    }

    // 选课
    pub async fn enroll(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll(self, user, course_id, ctx, request).await
    }

    // 退课
    pub async fn drop_enrollment(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::drop_enrollment(self, user, course_id, ctx, request).await
    }

    // 课程资料列表
    pub async fn list_materials(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::list_materials(self, user, course_id, request).await
    }

    // 添加课程资料
    pub async fn add_material(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        materials::add_material(self, user, course_id, ctx, request).await
    }

    // 课表
    pub async fn list_schedule(
        &self,
        user: CurrentUser,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::list_schedule(self, user, course_id, request).await
    }

    // 添加课表时段
    pub async fn add_schedule_slot(
        &self,
        user: CurrentUser,
        course_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        schedule::add_schedule_slot(self, user, course_id, ctx, request).await
    }
}

/// 院系必须存在
pub(crate) async fn check_department(storage: &dyn Storage, department_id: Option<i64>) -> Result<()> {
    if let Some(id) = department_id
        && storage.get_department_by_id(id).await?.is_none()
    {
        return Err(CollegeError::validation(format!("Department {id} does not exist")));
    }
    Ok(())
}

/// 指定的任课教师必须是已存在的教师
pub(crate) async fn check_instructor(storage: &dyn Storage, instructor_id: i64) -> Result<()> {
    match storage.get_user_by_id(instructor_id).await? {
        Some(user) if user.user_type.is_faculty() => Ok(()),
        _ => Err(CollegeError::validation(
            "instructor_id must refer to an existing faculty member",
        )),
    }
}

pub(crate) fn check_positive(name: &str, value: Option<i32>) -> Result<()> {
    match value {
        Some(v) if v <= 0 => Err(CollegeError::validation(format!(
            "{name} must be greater than 0"
        ))),
        _ => Ok(()),
    }
}
