use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{CourseService, check_department, check_instructor, check_positive};
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    courses::requests::CreateCourseRequest,
    users::{Permission, entities::UserType},
};
use crate::services::access::require_permission;
use crate::utils::RequestContext;

pub async fn create_course(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::CreateCourse)?;

    let mut req: CreateCourseRequest = ctx.parse_required(&["code", "name", "credits"])?;
    req.code = req.code.trim().to_string();
    req.name = req.name.trim().to_string();

    check_positive("credits", Some(req.credits))?;
    check_positive("max_students", req.max_students)?;
    check_department(storage.as_ref(), req.department_id).await?;

    if storage.get_course_by_code(&req.code).await?.is_some() {
        return Err(CollegeError::validation(format!(
            "Course code '{}' already exists",
            req.code
        ))
        .into());
    }

    // 教师创建的课程归自己，管理员可以指定任课教师
    match user.user_type {
        UserType::Faculty => req.instructor_id = Some(user.id),
        UserType::Admin => {
            if let Some(instructor_id) = req.instructor_id {
                check_instructor(storage.as_ref(), instructor_id).await?;
            }
        }
        UserType::Student => {
            return Err(CollegeError::authorization("Students cannot create courses").into());
        }
    }

    let course = storage.create_course(req).await?;

    info!("Course {} created by user {}", course.code, user.id);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        course,
        "Course created successfully",
    )))
}
