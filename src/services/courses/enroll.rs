use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CourseService;
use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse, ErrorCode,
    courses::{entities::Course, requests::EnrollRequest},
    users::entities::{User, UserType},
};
use crate::services::access::{ensure_course_manager, load_course, load_student};
use crate::utils::RequestContext;

/// 确定选课/退课的目标学生
///
/// 学生只能操作自己；管理员和任课教师必须给出 student_id。
fn target_student(user: &User, course: &Course, ctx: &RequestContext) -> Result<i64> {
    let req: EnrollRequest = ctx.parse()?;
    match user.user_type {
        UserType::Student => match req.student_id {
            Some(id) if id != user.id => Err(CollegeError::authorization(
                "Students can only enroll or drop themselves",
            )),
            _ => Ok(user.id),
        },
        _ => {
            ensure_course_manager(user, course)?;
            ctx.require(&["student_id"])?;
            req.student_id
                .ok_or_else(|| CollegeError::validation("Missing required parameters: student_id"))
        }
    }
}

pub async fn enroll(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let student_id = target_student(&user, &course, &ctx)?;
    load_student(storage.as_ref(), student_id).await?;

    if storage.get_enrollment(student_id, course_id).await?.is_some() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AlreadyExists,
            "Student is already enrolled in this course",
        )));
    }

    let enrolled = storage.count_enrollments(course_id).await?;
    if enrolled >= course.max_students.max(0) as u64 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CourseFull,
            "Course is full",
        )));
    }

    let enrollment = storage.create_enrollment(student_id, course_id).await?;

    info!("Student {} enrolled in course {}", student_id, course.code);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Enrolled successfully",
    )))
}

pub async fn drop_enrollment(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    let student_id = target_student(&user, &course, &ctx)?;

    if !storage.delete_enrollment(student_id, course_id).await? {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotEnrolled,
            "Student is not enrolled in this course",
        )));
    }

    info!("Student {} dropped course {}", student_id, course.code);

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Enrollment dropped successfully")))
}
