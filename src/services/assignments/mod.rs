pub mod create;
pub mod delete;
pub mod detail;
pub mod grade;
pub mod list;
pub mod submissions;
pub mod submit;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::assignments::{
    entities::Assignment, responses::AssignmentView,
};
use crate::models::courses::entities::Course;
use crate::models::users::entities::User;
use crate::services::access::load_course;
use crate::storage::Storage;
use crate::utils::RequestContext;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    // 作业列表
    pub async fn list_assignments(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, user, ctx, request).await
    }

    // 作业详情
    pub async fn get_assignment(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, user, assignment_id, request).await
    }

    // 布置作业
    pub async fn create_assignment(
        &self,
        user: CurrentUser,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, user, ctx, request).await
    }

    // 修改作业
    pub async fn update_assignment(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, user, assignment_id, ctx, request).await
    }

    // 删除作业
    pub async fn delete_assignment(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, user, assignment_id, request).await
    }

    // 提交作业
    pub async fn submit(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, user, assignment_id, ctx, request).await
    }

    // 提交列表
    pub async fn list_submissions(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, user, assignment_id, request).await
    }

    // 单个提交
    pub async fn get_submission(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::get_submission(self, user, assignment_id, ctx, request).await
    }

    // 批改
    pub async fn grade(
        &self,
        user: CurrentUser,
        assignment_id: i64,
        ctx: RequestContext,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, user, assignment_id, ctx, request).await
    }
}

/// 加载作业及其课程
pub(crate) async fn load_assignment(
    storage: &dyn Storage,
    assignment_id: i64,
) -> Result<(Assignment, Course)> {
    let assignment = storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Assignment not found"))?;
    let course = load_course(storage, assignment.course_id).await?;
    Ok((assignment, course))
}

/// 组装作业视图，学生附带自己的提交
pub(crate) async fn build_views(
    storage: &dyn Storage,
    user: &User,
    assignments: Vec<Assignment>,
) -> Result<Vec<AssignmentView>> {
    let mut courses: HashMap<i64, Course> = HashMap::new();
    for assignment in &assignments {
        if !courses.contains_key(&assignment.course_id)
            && let Some(course) = storage.get_course_by_id(assignment.course_id).await?
        {
            courses.insert(course.id, course);
        }
    }

    let mut submissions = HashMap::new();
    if user.user_type.is_student() && !assignments.is_empty() {
        let ids = assignments.iter().map(|a| a.id).collect();
        for submission in storage.list_student_submissions(user.id, ids).await? {
            submissions.insert(submission.assignment_id, submission);
        }
    }

    Ok(assignments
        .into_iter()
        .map(|assignment| {
            let course = courses.get(&assignment.course_id);
            AssignmentView {
                course_code: course.map(|c| c.code.clone()),
                course_name: course.map(|c| c.name.clone()),
                my_submission: submissions.remove(&assignment.id),
                assignment,
            }
        })
        .collect())
}

pub(crate) fn check_marks(total_marks: Option<f64>, weightage: Option<f64>) -> Result<()> {
    if let Some(total) = total_marks
        && total <= 0.0
    {
        return Err(CollegeError::validation("total_marks must be greater than 0"));
    }
    if let Some(w) = weightage
        && w < 0.0
    {
        return Err(CollegeError::validation("weightage cannot be negative"));
    }
    Ok(())
}
