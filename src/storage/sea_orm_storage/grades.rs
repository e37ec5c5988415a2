use std::collections::HashMap;

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{courses, enrollments, users};
use crate::errors::Result;
use crate::models::grades::{
    entities::GradeRow, requests::GradeUpdate, responses::BatchGradeResponse,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};

impl SeaOrmStorage {
    /// 按学生和/或课程范围列出成绩行
    pub async fn list_grade_rows_impl(
        &self,
        student_id: Option<i64>,
        course_ids: Option<Vec<i64>>,
    ) -> Result<Vec<GradeRow>> {
        let mut select = Enrollments::find();

        if let Some(student_id) = student_id {
            select = select.filter(enrollments::Column::StudentId.eq(student_id));
        }
        if let Some(ids) = course_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(enrollments::Column::CourseId.is_in(ids));
        }

        let rows = select
            .all(&self.db)
            .await
            .map_err(read_err("查询成绩失败"))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = rows.iter().map(|r| r.course_id).collect();
        let student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();

        let courses: HashMap<i64, courses::Model> = Courses::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let students: HashMap<i64, String> = Users::find()
            .filter(users::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询学生信息失败"))?
            .into_iter()
            .map(|u| (u.id, u.full_name))
            .collect();

        let mut grade_rows: Vec<GradeRow> = rows
            .into_iter()
            .filter_map(|row| {
                let course = courses.get(&row.course_id)?;
                let student_name = students.get(&row.student_id)?.clone();
                let enrollment = row.into_enrollment();
                Some(GradeRow {
                    enrollment_id: enrollment.id,
                    student_id: enrollment.student_id,
                    student_name,
                    course_id: course.id,
                    course_code: course.code.clone(),
                    course_name: course.name.clone(),
                    credits: course.credits,
                    grade_point: enrollment.grade_point,
                    grade_letter: enrollment.grade_letter,
                    remarks: enrollment.remarks,
                    graded_at: enrollment.graded_at,
                })
            })
            .collect();

        grade_rows.sort_by(|a, b| {
            a.course_code
                .cmp(&b.course_code)
                .then_with(|| a.student_name.cmp(&b.student_name))
        });

        Ok(grade_rows)
    }

    /// 批量录入课程成绩，未选课的学生跳过
    pub async fn record_grades_impl(
        &self,
        course_id: i64,
        grades: Vec<GradeUpdate>,
    ) -> Result<BatchGradeResponse> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let mut result = BatchGradeResponse::default();

        for grade in grades {
            let existing = Enrollments::find()
                .filter(enrollments::Column::CourseId.eq(course_id))
                .filter(enrollments::Column::StudentId.eq(grade.student_id))
                .one(&txn)
                .await
                .map_err(read_err("查询选课记录失败"))?;

            let Some(existing) = existing else {
                result.skipped += 1;
                continue;
            };

            let mut model: EnrollmentActiveModel = existing.into();
            model.grade_letter = Set(Some(grade.grade_letter));
            model.grade_point = Set(Some(grade.grade_point));
            model.remarks = Set(grade.remarks);
            model.graded_at = Set(Some(now));
            model.updated_at = Set(now);
            model.update(&txn).await.map_err(write_err("录入成绩失败"))?;
            result.updated += 1;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::grades::entities::compute_gpa;
    use crate::models::users::{entities::UserType, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    #[tokio::test]
    async fn test_record_grades_and_gpa() {
        let storage = memory_storage().await;
        let student = storage
            .create_user_impl(CreateUserRequest {
                full_name: "Stu".to_string(),
                email: "stu@test.local".to_string(),
                password_hash: "hash".to_string(),
                user_type: UserType::Student,
                phone: None,
                profile: Default::default(),
            })
            .await
            .unwrap()
            .id;

        let mut course_ids = Vec::new();
        for (code, credits) in [("CS101", 4), ("MA101", 3)] {
            let course = storage
                .create_course_impl(CreateCourseRequest {
                    code: code.to_string(),
                    name: code.to_string(),
                    description: None,
                    credits,
                    semester: None,
                    department_id: None,
                    instructor_id: None,
                    max_students: None,
                })
                .await
                .unwrap();
            storage.create_enrollment_impl(student, course.id).await.unwrap();
            course_ids.push(course.id);
        }

        let outcome = storage
            .record_grades_impl(
                course_ids[0],
                vec![
                    GradeUpdate {
                        student_id: student,
                        grade_letter: "A".to_string(),
                        grade_point: 4.0,
                        remarks: None,
                    },
                    GradeUpdate {
                        student_id: student + 100,
                        grade_letter: "B".to_string(),
                        grade_point: 3.0,
                        remarks: None,
                    },
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            outcome,
            BatchGradeResponse {
                updated: 1,
                skipped: 1
            }
        );

        storage
            .record_grades_impl(
                course_ids[1],
                vec![GradeUpdate {
                    student_id: student,
                    grade_letter: "B+".to_string(),
                    grade_point: 3.3,
                    remarks: Some("good".to_string()),
                }],
            )
            .await
            .unwrap();

        let rows = storage.list_grade_rows_impl(Some(student), None).await.unwrap();
        assert_eq!(rows.len(), 2);
        let gpa = compute_gpa(rows.iter().map(|r| (r.credits, r.grade_point)));
        // (4*4.0 + 3*3.3) / 7 = 3.70
        assert_eq!(gpa.gpa, 3.7);
        assert_eq!(gpa.total_credits, 7);
    }
}
