//! 各资源共用的访问控制
//!
//! - 教师只能操作自己任课的课程，管理员不受限制
//! - 学生只能读取已选课程，且只能看到自己的提交、考勤和成绩

use crate::errors::{CollegeError, Result};
use crate::models::courses::entities::Course;
use crate::models::notices::entities::NoticeAudience;
use crate::models::users::{
    Permission,
    entities::{User, UserType},
};
use crate::storage::Storage;

pub const NOT_ENROLLED: &str = "You are not enrolled in this course";
pub const OWN_RECORDS_ONLY: &str = "You can only access your own records";

pub fn require_permission(user: &User, permission: Permission) -> Result<()> {
    if user.user_type.can(permission) {
        Ok(())
    } else {
        Err(CollegeError::authorization(
            "You do not have permission to perform this action",
        ))
    }
}

/// 本人或管理员
pub fn ensure_self_or_admin(user: &User, target_id: i64) -> Result<()> {
    if user.id == target_id || user.user_type.is_admin() {
        Ok(())
    } else {
        Err(CollegeError::authorization(OWN_RECORDS_ONLY))
    }
}

pub async fn load_course(storage: &dyn Storage, course_id: i64) -> Result<Course> {
    storage
        .get_course_by_id(course_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Course not found"))
}

/// 课程管理权：管理员或任课教师
pub fn ensure_course_manager(user: &User, course: &Course) -> Result<()> {
    match user.user_type {
        UserType::Admin => Ok(()),
        UserType::Faculty if course.is_taught_by(user.id) => Ok(()),
        _ => Err(CollegeError::authorization(
            "You do not have permission to manage this course",
        )),
    }
}

/// 课程读取权：管理员、任课教师或已选课学生
pub async fn ensure_course_reader(storage: &dyn Storage, user: &User, course: &Course) -> Result<()> {
    match user.user_type {
        UserType::Admin => Ok(()),
        UserType::Faculty if course.is_taught_by(user.id) => Ok(()),
        UserType::Faculty => Err(CollegeError::authorization(
            "You do not teach this course",
        )),
        UserType::Student => {
            if storage.get_enrollment(user.id, course.id).await?.is_some() {
                Ok(())
            } else {
                Err(CollegeError::authorization(NOT_ENROLLED))
            }
        }
    }
}

/// 学生只能查询自己：返回实际要查询的学生ID
///
/// 学生传入别人的ID时返回 403；其他角色原样返回请求的ID。
pub fn student_scope(user: &User, requested: Option<i64>) -> Result<Option<i64>> {
    if !user.user_type.is_student() {
        return Ok(requested);
    }
    match requested {
        Some(id) if id != user.id => Err(CollegeError::authorization(OWN_RECORDS_ONLY)),
        _ => Ok(Some(user.id)),
    }
}

/// 调用者可见的课程ID，管理员返回 None 表示全部
pub async fn visible_course_ids(storage: &dyn Storage, user: &User) -> Result<Option<Vec<i64>>> {
    match user.user_type {
        UserType::Admin => Ok(None),
        UserType::Faculty => Ok(Some(storage.list_taught_course_ids(user.id).await?)),
        UserType::Student => Ok(Some(storage.list_enrolled_course_ids(user.id).await?)),
    }
}

/// 调用者能看到的公告范围
pub async fn notice_audience(storage: &dyn Storage, user: &User) -> Result<NoticeAudience> {
    let department_id = storage
        .get_user_profile(user.id, user.user_type)
        .await?
        .and_then(|p| p.department_id());

    match user.user_type {
        UserType::Admin => Ok(NoticeAudience::Everything),
        UserType::Faculty => Ok(NoticeAudience::Scoped {
            course_ids: storage.list_taught_course_ids(user.id).await?,
            department_id,
            author_id: Some(user.id),
        }),
        UserType::Student => Ok(NoticeAudience::Scoped {
            course_ids: storage.list_enrolled_course_ids(user.id).await?,
            department_id,
            author_id: None,
        }),
    }
}

/// 目标用户必须存在且是学生
pub async fn load_student(storage: &dyn Storage, student_id: i64) -> Result<User> {
    let student = storage
        .get_user_by_id(student_id)
        .await?
        .ok_or_else(|| CollegeError::not_found("Student not found"))?;
    if !student.user_type.is_student() {
        return Err(CollegeError::validation("Target user is not a student"));
    }
    Ok(student)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(id: i64, user_type: UserType) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            full_name: "u".into(),
            email: format!("u{id}@example.edu"),
            password_hash: String::new(),
            user_type,
            status: UserStatus::Active,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn course(instructor_id: Option<i64>) -> Course {
        let now = chrono::Utc::now();
        Course {
            id: 1,
            code: "CS101".into(),
            name: "Intro".into(),
            description: None,
            credits: 3,
            semester: None,
            department_id: None,
            instructor_id,
            max_students: 60,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_course_manager() {
        let c = course(Some(2));
        assert!(ensure_course_manager(&user(1, UserType::Admin), &c).is_ok());
        assert!(ensure_course_manager(&user(2, UserType::Faculty), &c).is_ok());
        assert!(ensure_course_manager(&user(3, UserType::Faculty), &c).is_err());
        assert!(ensure_course_manager(&user(2, UserType::Student), &c).is_err());
    }

    #[test]
    fn test_student_scope() {
        let student = user(5, UserType::Student);
        assert_eq!(student_scope(&student, None).unwrap(), Some(5));
        assert_eq!(student_scope(&student, Some(5)).unwrap(), Some(5));
        let err = student_scope(&student, Some(6)).unwrap_err();
        assert_eq!(err.status(), actix_web::http::StatusCode::FORBIDDEN);

        let admin = user(1, UserType::Admin);
        assert_eq!(student_scope(&admin, Some(6)).unwrap(), Some(6));
        assert_eq!(student_scope(&admin, None).unwrap(), None);
    }

    #[test]
    fn test_self_or_admin() {
        assert!(ensure_self_or_admin(&user(4, UserType::Student), 4).is_ok());
        assert!(ensure_self_or_admin(&user(4, UserType::Faculty), 5).is_err());
        assert!(ensure_self_or_admin(&user(1, UserType::Admin), 5).is_ok());
    }
}
