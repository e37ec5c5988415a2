use std::collections::HashMap;

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{assignments, submissions, users};
use crate::errors::Result;
use crate::models::assignments::{
    entities::{Assignment, Submission, SubmissionStatus},
    requests::{AssignmentChanges, NewAssignment},
    responses::SubmissionWithStudent,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(&self, req: NewAssignment) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = AssignmentActiveModel {
            course_id: Set(req.course_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date),
            total_marks: Set(req.total_marks),
            weightage: Set(req.weightage),
            created_by: Set(req.created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(write_err("创建作业失败"))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出作业，按截止时间升序
    pub async fn list_assignments_impl(
        &self,
        course_ids: Option<Vec<i64>>,
    ) -> Result<Vec<Assignment>> {
        let mut select = Assignments::find();

        if let Some(ids) = course_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            select = select.filter(assignments::Column::CourseId.is_in(ids));
        }

        let result = select
            .order_by_asc(assignments::Column::DueDate)
            .order_by_asc(assignments::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err("查询作业列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        let Some(existing) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询作业失败"))?
        else {
            return Ok(None);
        };

        let mut model: AssignmentActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(description) = changes.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = changes.due_date {
            model.due_date = Set(due_date);
        }
        if let Some(total_marks) = changes.total_marks {
            model.total_marks = Set(total_marks);
        }
        if let Some(weightage) = changes.weightage {
            model.weightage = Set(weightage);
        }

        let result = model.update(&self.db).await.map_err(write_err("更新作业失败"))?;

        Ok(Some(result.into_assignment()))
    }

    /// 删除作业及其提交
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        Submissions::delete_many()
            .filter(submissions::Column::AssignmentId.eq(id))
            .exec(&txn)
            .await
            .map_err(write_err("删除作业提交失败"))?;

        let result = Assignments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(write_err("删除作业失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn get_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .filter(submissions::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 写入提交；已有提交时覆盖文件并清空批改结果
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        file_path: &str,
        comments: Option<String>,
        status: SubmissionStatus,
    ) -> Result<(Submission, bool)> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let existing = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .filter(submissions::Column::StudentId.eq(student_id))
            .one(&txn)
            .await
            .map_err(read_err("查询提交失败"))?;

        let resubmitted = existing.is_some();
        let saved = match existing {
            Some(existing) => {
                let mut model: SubmissionActiveModel = existing.into();
                model.file_path = Set(file_path.to_string());
                model.comments = Set(comments);
                model.submitted_at = Set(now);
                model.status = Set(status.to_string());
                model.score = Set(None);
                model.feedback = Set(None);
                model.graded_by = Set(None);
                model.graded_at = Set(None);
                model.update(&txn).await.map_err(write_err("更新提交失败"))?
            }
            None => SubmissionActiveModel {
                assignment_id: Set(assignment_id),
                student_id: Set(student_id),
                file_path: Set(file_path.to_string()),
                comments: Set(comments),
                submitted_at: Set(now),
                status: Set(status.to_string()),
                score: Set(None),
                feedback: Set(None),
                graded_by: Set(None),
                graded_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(write_err("创建提交失败"))?,
        };

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok((saved.into_submission(), resubmitted))
    }

    /// 作业的所有提交，附带学生姓名和邮箱
    pub async fn list_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithStudent>> {
        let rows = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .order_by_asc(submissions::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(read_err("查询提交列表失败"))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();
        let students: HashMap<i64, users::Model> = Users::find()
            .filter(users::Column::Id.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询学生信息失败"))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let student = students.get(&row.student_id)?;
                Some(SubmissionWithStudent {
                    student_name: student.full_name.clone(),
                    student_email: student.email.clone(),
                    submission: row.into_submission(),
                })
            })
            .collect())
    }

    /// 学生在指定作业上的提交
    pub async fn list_student_submissions_impl(
        &self,
        student_id: i64,
        assignment_ids: Vec<i64>,
    ) -> Result<Vec<Submission>> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = Submissions::find()
            .filter(submissions::Column::StudentId.eq(student_id))
            .filter(submissions::Column::AssignmentId.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询学生提交失败"))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 批改提交
    pub async fn grade_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        let Some(existing) = Submissions::find()
            .filter(submissions::Column::AssignmentId.eq(assignment_id))
            .filter(submissions::Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询提交失败"))?
        else {
            return Ok(None);
        };

        let mut model: SubmissionActiveModel = existing.into();
        model.score = Set(Some(score));
        model.feedback = Set(feedback);
        model.graded_by = Set(Some(graded_by));
        model.graded_at = Set(Some(chrono::Utc::now().timestamp()));
        model.status = Set(SubmissionStatus::Graded.to_string());

        let result = model.update(&self.db).await.map_err(write_err("批改提交失败"))?;

        Ok(Some(result.into_submission()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::{entities::UserType, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    async fn setup(storage: &SeaOrmStorage) -> (i64, i64, Assignment) {
        let faculty = storage
            .create_user_impl(CreateUserRequest {
                full_name: "Prof".to_string(),
                email: "prof@test.local".to_string(),
                password_hash: "hash".to_string(),
                user_type: UserType::Faculty,
                phone: None,
                profile: Default::default(),
            })
            .await
            .unwrap();
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
            .unwrap();
        let course = storage
            .create_course_impl(CreateCourseRequest {
                code: "CS101".to_string(),
                name: "Intro".to_string(),
                description: None,
                credits: 3,
                semester: None,
                department_id: None,
                instructor_id: Some(faculty.id),
                max_students: None,
            })
            .await
            .unwrap();
        let assignment = storage
            .create_assignment_impl(NewAssignment {
                course_id: course.id,
                title: "HW1".to_string(),
                description: None,
                due_date: chrono::Utc::now().timestamp() + 3600,
                total_marks: 100.0,
                weightage: 10.0,
                created_by: faculty.id,
            })
            .await
            .unwrap();
        (faculty.id, student.id, assignment)
    }

    #[tokio::test]
    async fn test_resubmission_overwrites_and_clears_grade() {
        let storage = memory_storage().await;
        let (faculty, student, assignment) = setup(&storage).await;

        let (_, resubmitted) = storage
            .upsert_submission_impl(
                assignment.id,
                student,
                "/uploads/v1.pdf",
                None,
                SubmissionStatus::Submitted,
            )
            .await
            .unwrap();
        assert!(!resubmitted);

        let graded = storage
            .grade_submission_impl(assignment.id, student, 80.0, Some("ok".into()), faculty)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);

        let (again, resubmitted) = storage
            .upsert_submission_impl(
                assignment.id,
                student,
                "/uploads/v2.pdf",
                None,
                SubmissionStatus::Late,
            )
            .await
            .unwrap();
        assert!(resubmitted);
        assert_eq!(again.file_path, "/uploads/v2.pdf");
        assert_eq!(again.status, SubmissionStatus::Late);
        assert_eq!(again.score, None);

        assert_eq!(storage.list_submissions_impl(assignment.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_grade_missing_submission() {
        let storage = memory_storage().await;
        let (faculty, student, assignment) = setup(&storage).await;

        let result = storage
            .grade_submission_impl(assignment.id, student, 50.0, None, faculty)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_assignment_removes_submissions() {
        let storage = memory_storage().await;
        let (_, student, assignment) = setup(&storage).await;
        storage
            .upsert_submission_impl(assignment.id, student, "/f", None, SubmissionStatus::Submitted)
            .await
            .unwrap();

        assert!(storage.delete_assignment_impl(assignment.id).await.unwrap());
        assert!(
            storage
                .get_submission_impl(assignment.id, student)
                .await
                .unwrap()
                .is_none()
        );
    }
}
