use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, build_views};
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, assignments::requests::AssignmentListQuery};
use crate::services::access::{ensure_course_reader, load_course, visible_course_ids};
use crate::utils::RequestContext;

pub async fn list_assignments(
    service: &AssignmentService,
    CurrentUser(user): CurrentUser,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let query: AssignmentListQuery = ctx.parse()?;

    let course_ids = match query.course_id {
        Some(course_id) => {
            let course = load_course(storage.as_ref(), course_id).await?;
            ensure_course_reader(storage.as_ref(), &user, &course).await?;
            Some(vec![course_id])
        }
        None => visible_course_ids(storage.as_ref(), &user).await?,
    };

    let assignments = storage.list_assignments(course_ids).await?;
    let views = build_views(storage.as_ref(), &user, assignments).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        views,
        "Assignments retrieved successfully",
    )))
}
