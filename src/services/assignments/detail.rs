use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment};
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, assignments::responses::AssignmentView};
use crate::services::access::ensure_course_reader;

pub async fn get_assignment(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let (assignment, course) = load_assignment(storage.as_ref(), assignment_id).await?;
    ensure_course_reader(storage.as_ref(), &user, &course).await?;

    let my_submission = if user.user_type.is_student() {
        storage.get_submission(assignment.id, user.id).await?
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        AssignmentView {
            assignment,
            course_code: Some(course.code),
            course_name: Some(course.name),
            my_submission,
        },
        "Assignment retrieved successfully",
    )))
}
