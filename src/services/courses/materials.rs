use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::errors::CollegeError;
use crate::middlewares::CurrentUser;
use crate::models::{ApiResponse, courses::requests::CreateMaterialRequest};
use crate::services::access::{ensure_course_manager, ensure_course_reader, load_course};
use crate::utils::RequestContext;

pub async fn list_materials(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_reader(storage.as_ref(), &user, &course).await?;

    let materials = storage.list_course_materials(course_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        materials,
        "Materials retrieved successfully",
    )))
}

pub async fn add_material(
    service: &CourseService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    let mut req: CreateMaterialRequest = ctx.parse_required(&["title"])?;
    req.title = req.title.trim().to_string();
    if req.title.is_empty() {
        return Err(CollegeError::validation("title cannot be empty").into());
    }

    let material = storage
        .create_course_material(course_id, user.id, req)
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        material,
        "Material added successfully",
    )))
}
