use std::collections::{BTreeMap, HashMap, HashSet};

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{attendance, enrollments, users};
use crate::errors::Result;
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus, attendance_percentage},
    requests::AttendanceQuery,
    responses::{
        AttendanceSummaryResponse, AttendanceSummaryRow, AttendanceView, MarkAttendanceResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 批量记考勤；同一学生同一天重复记录时覆盖，未选课的学生跳过
    pub async fn mark_attendance_impl(
        &self,
        course_id: i64,
        date: &str,
        recorded_by: i64,
        records: Vec<(i64, AttendanceStatus, Option<String>)>,
    ) -> Result<MarkAttendanceResponse> {
        let now = chrono::Utc::now().timestamp();
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let enrolled: HashSet<i64> = Enrollments::find()
            .select_only()
            .column(enrollments::Column::StudentId)
            .filter(enrollments::Column::CourseId.eq(course_id))
            .into_tuple::<i64>()
            .all(&txn)
            .await
            .map_err(read_err("查询选课名单失败"))?
            .into_iter()
            .collect();

        let mut summary = MarkAttendanceResponse::default();

        for (student_id, status, remarks) in records {
            if !enrolled.contains(&student_id) {
                summary.skipped += 1;
                continue;
            }

            let existing = Attendance::find()
                .filter(attendance::Column::StudentId.eq(student_id))
                .filter(attendance::Column::CourseId.eq(course_id))
                .filter(attendance::Column::Date.eq(date))
                .one(&txn)
                .await
                .map_err(read_err("查询考勤失败"))?;

            match existing {
                Some(existing) => {
                    let mut model: AttendanceActiveModel = existing.into();
                    model.status = Set(status.to_string());
                    model.remarks = Set(remarks);
                    model.recorded_by = Set(recorded_by);
                    model.updated_at = Set(now);
                    model.update(&txn).await.map_err(write_err("更新考勤失败"))?;
                    summary.updated += 1;
                }
                None => {
                    AttendanceActiveModel {
                        student_id: Set(student_id),
                        course_id: Set(course_id),
                        date: Set(date.to_string()),
                        status: Set(status.to_string()),
                        remarks: Set(remarks),
                        recorded_by: Set(recorded_by),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(write_err("写入考勤失败"))?;
                    summary.inserted += 1;
                }
            }
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(summary)
    }

    /// 查询考勤记录，附带学生姓名
    pub async fn list_attendance_impl(&self, query: AttendanceQuery) -> Result<Vec<AttendanceView>> {
        let mut select = Attendance::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(attendance::Column::CourseId.eq(course_id));
        }
        if let Some(ref date) = query.date {
            select = select.filter(attendance::Column::Date.eq(date.as_str()));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(attendance::Column::StudentId.eq(student_id));
        }

        let rows = select
            .order_by_desc(attendance::Column::Date)
            .order_by_asc(attendance::Column::StudentId)
            .all(&self.db)
            .await
            .map_err(read_err("查询考勤失败"))?;

        let names = self.student_names(rows.iter().map(|r| r.student_id)).await?;

        Ok(rows
            .into_iter()
            .map(|row| AttendanceView {
                student_name: names.get(&row.student_id).cloned().unwrap_or_default(),
                record: row.into_record(),
            })
            .collect())
    }

    /// 课程出勤统计：分母为该课程记录过考勤的不同日期数
    pub async fn attendance_summary_impl(
        &self,
        course_id: i64,
        student_id: Option<i64>,
    ) -> Result<AttendanceSummaryResponse> {
        let records = Attendance::find()
            .filter(attendance::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(read_err("查询考勤失败"))?;

        let total_dates = records
            .iter()
            .map(|r| r.date.as_str())
            .collect::<HashSet<_>>()
            .len() as u64;

        // (present, absent, late)
        let mut tallies: BTreeMap<i64, (u64, u64, u64)> = BTreeMap::new();

        let enrolled: Vec<i64> = Enrollments::find()
            .select_only()
            .column(enrollments::Column::StudentId)
            .filter(enrollments::Column::CourseId.eq(course_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("查询选课名单失败"))?;
        for id in enrolled {
            tallies.entry(id).or_default();
        }

        for record in &records {
            let tally = tallies.entry(record.student_id).or_default();
            match record.status.parse::<AttendanceStatus>() {
                Ok(AttendanceStatus::Present) => tally.0 += 1,
                Ok(AttendanceStatus::Absent) => tally.1 += 1,
                Ok(AttendanceStatus::Late) => tally.2 += 1,
                Err(_) => {}
            }
        }

        if let Some(student_id) = student_id {
            tallies.retain(|id, _| *id == student_id);
        }

        let names = self.student_names(tallies.keys().copied()).await?;

        let items = tallies
            .into_iter()
            .map(|(id, (present, absent, late))| AttendanceSummaryRow {
                student_id: id,
                full_name: names.get(&id).cloned().unwrap_or_default(),
                present,
                absent,
                late,
                total_dates,
                percentage: attendance_percentage(present, late, total_dates),
            })
            .collect();

        Ok(AttendanceSummaryResponse {
            course_id,
            total_dates,
            items,
        })
    }

    pub async fn get_attendance_by_id_impl(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        let result = Attendance::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询考勤失败"))?;

        Ok(result.map(|m| m.into_record()))
    }

    pub async fn update_attendance_impl(
        &self,
        id: i64,
        status: Option<AttendanceStatus>,
        remarks: Option<String>,
    ) -> Result<Option<AttendanceRecord>> {
        let Some(existing) = Attendance::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询考勤失败"))?
        else {
            return Ok(None);
        };

        let mut model: AttendanceActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());
        if let Some(status) = status {
            model.status = Set(status.to_string());
        }
        if let Some(remarks) = remarks {
            model.remarks = Set(Some(remarks));
        }

        let result = model.update(&self.db).await.map_err(write_err("更新考勤失败"))?;

        Ok(Some(result.into_record()))
    }

    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let result = Attendance::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(write_err("删除考勤失败"))?;

        Ok(result.rows_affected > 0)
    }

    async fn student_names(
        &self,
        ids: impl Iterator<Item = i64>,
    ) -> Result<HashMap<i64, String>> {
        let ids: Vec<i64> = ids.collect::<HashSet<_>>().into_iter().collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> = Users::find()
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::FullName)
            .filter(users::Column::Id.is_in(ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("查询学生姓名失败"))?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::users::{entities::UserType, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::test_support::memory_storage;

    async fn student(storage: &SeaOrmStorage, email: &str) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                full_name: email.to_string(),
                email: email.to_string(),
                password_hash: "hash".to_string(),
                user_type: UserType::Student,
                phone: None,
                profile: Default::default(),
            })
            .await
            .unwrap()
            .id
    }

    async fn course(storage: &SeaOrmStorage) -> i64 {
        storage
            .create_course_impl(CreateCourseRequest {
                code: "CS101".to_string(),
                name: "Intro".to_string(),
                description: None,
                credits: 3,
                semester: None,
                department_id: None,
                instructor_id: None,
                max_students: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_mark_twice_updates_and_skips_unenrolled() {
        let storage = memory_storage().await;
        let course_id = course(&storage).await;
        let a = student(&storage, "a@test.local").await;
        let outsider = student(&storage, "b@test.local").await;
        storage.create_enrollment_impl(a, course_id).await.unwrap();

        let first = storage
            .mark_attendance_impl(
                course_id,
                "2025-01-10",
                0,
                vec![
                    (a, AttendanceStatus::Absent, None),
                    (outsider, AttendanceStatus::Present, None),
                ],
            )
            .await
            .unwrap();
        assert_eq!(
            first,
            MarkAttendanceResponse {
                inserted: 1,
                updated: 0,
                skipped: 1
            }
        );

        let second = storage
            .mark_attendance_impl(
                course_id,
                "2025-01-10",
                0,
                vec![(a, AttendanceStatus::Present, None)],
            )
            .await
            .unwrap();
        assert_eq!(second.updated, 1);

        let rows = storage
            .list_attendance_impl(AttendanceQuery {
                course_id: Some(course_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].record.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn test_summary_percentage() {
        let storage = memory_storage().await;
        let course_id = course(&storage).await;
        let a = student(&storage, "a@test.local").await;
        let b = student(&storage, "b@test.local").await;
        storage.create_enrollment_impl(a, course_id).await.unwrap();
        storage.create_enrollment_impl(b, course_id).await.unwrap();

        for (date, status) in [
            ("2025-01-01", AttendanceStatus::Present),
            ("2025-01-02", AttendanceStatus::Late),
            ("2025-01-03", AttendanceStatus::Absent),
        ] {
            storage
                .mark_attendance_impl(course_id, date, 0, vec![(a, status, None)])
                .await
                .unwrap();
        }

        let summary = storage.attendance_summary_impl(course_id, None).await.unwrap();
        assert_eq!(summary.total_dates, 3);
        let row_a = summary.items.iter().find(|r| r.student_id == a).unwrap();
        assert_eq!(row_a.percentage, 66.67);
        let row_b = summary.items.iter().find(|r| r.student_id == b).unwrap();
        assert_eq!(row_b.percentage, 0.0);

        let only_b = storage
            .attendance_summary_impl(course_id, Some(b))
            .await
            .unwrap();
        assert_eq!(only_b.items.len(), 1);
    }
}
