use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::errors::{CollegeError, Result};
use crate::middlewares::CurrentUser;
use crate::models::{
    ApiResponse,
    grades::{
        entities::letter_to_point,
        requests::{BatchGradeRequest, GradeEntry, GradeUpdate},
    },
    users::Permission,
};
use crate::services::access::{ensure_course_manager, load_course, require_permission};
use crate::utils::RequestContext;

/// 绩点缺省时按等级换算，最终必须落在 [0, 4]
fn to_update(entry: GradeEntry) -> Result<GradeUpdate> {
    let letter = entry.grade_letter.trim().to_ascii_uppercase();
    if letter.is_empty() {
        return Err(CollegeError::validation(format!(
            "grade_letter is required for student {}",
            entry.student_id
        )));
    }

    let grade_point = match entry.grade_point {
        Some(point) => point,
        None => letter_to_point(&letter).ok_or_else(|| {
            CollegeError::validation(format!(
                "Unknown grade_letter '{letter}'; supply grade_point explicitly"
            ))
        })?,
    };

    if !(0.0..=4.0).contains(&grade_point) {
        return Err(CollegeError::validation(format!(
            "grade_point must be between 0 and 4 (student {})",
            entry.student_id
        )));
    }

    Ok(GradeUpdate {
        student_id: entry.student_id,
        grade_letter: letter,
        grade_point,
        remarks: entry.remarks,
    })
}

pub async fn record_grades(
    service: &GradeService,
    CurrentUser(user): CurrentUser,
    course_id: i64,
    ctx: RequestContext,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&user, Permission::RecordGrades)?;

    let course = load_course(storage.as_ref(), course_id).await?;
    ensure_course_manager(&user, &course)?;

    let req: BatchGradeRequest = ctx.parse_required(&["grades"])?;
    if req.grades.is_empty() {
        return Err(CollegeError::validation("grades must not be empty").into());
    }

    let mut updates = Vec::with_capacity(req.grades.len());
    for entry in req.grades {
        updates.push(to_update(entry)?);
    }

    // 未选课的学生跳过，整批在一个事务中写入
    let result = storage.record_grades(course.id, updates).await?;

    info!(
        "Grades recorded for course {}: {} updated, {} skipped",
        course.code, result.updated, result.skipped
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        result,
        "Grades recorded successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(letter: &str, point: Option<f64>) -> GradeEntry {
        GradeEntry {
            student_id: 1,
            grade_letter: letter.into(),
            grade_point: point,
            remarks: None,
        }
    }

    #[test]
    fn test_point_defaults_from_letter() {
        let update = to_update(entry("b+", None)).unwrap();
        assert_eq!(update.grade_letter, "B+");
        assert_eq!(update.grade_point, 3.3);
    }

    #[test]
    fn test_explicit_point_wins() {
        let update = to_update(entry("A", Some(3.9))).unwrap();
        assert_eq!(update.grade_point, 3.9);
    }

    #[test]
    fn test_rejects_out_of_range_and_unknown() {
        assert!(to_update(entry("A", Some(4.5))).is_err());
        assert!(to_update(entry("Z", None)).is_err());
        assert!(to_update(entry(" ", Some(2.0))).is_err());
    }
}
