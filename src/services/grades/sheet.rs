use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    grades::{entities::grade_distribution, responses::CourseGradeSheet},
};
use crate::services::access::{ensure_course_manager, load_course};

pub async fn course_sheet(
    service: &GradeService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    let students = storage
        .list_grade_rows(None, Some(vec![course.id]))
        .await?;
    let distribution = grade_distribution(students.iter().map(|r| r.grade_letter.as_deref()));

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseGradeSheet {
            course,
            students,
            distribution,
        },
        "Grade sheet retrieved successfully",
    )))
}
