use std::collections::HashMap;

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::prelude::*;
use crate::entity::{
    assignments, attendance, course_materials, course_schedules, courses, enrollments,
    notice_attachments, notice_reads, notices, student_profiles, submissions, users,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    courses::{
        entities::{Course, CourseMaterial, Enrollment, ScheduleSlot},
        requests::{
            CourseListQuery, CourseScope, CreateCourseRequest, CreateMaterialRequest,
            CreateScheduleRequest, DEFAULT_MAX_STUDENTS, UpdateCourseRequest,
        },
        responses::{CourseListResponse, CourseStudent, CourseSummary},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = CourseActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            credits: Set(req.credits),
            semester: Set(req.semester),
            department_id: Set(req.department_id),
            instructor_id: Set(req.instructor_id),
            max_students: Set(req.max_students.unwrap_or(DEFAULT_MAX_STUDENTS)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(write_err("创建课程失败"))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过课程代码获取课程
    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(courses::Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 按可见范围分页列出课程，附带选课人数
    pub async fn list_courses_with_pagination_impl(
        &self,
        scope: CourseScope,
        query: CourseListQuery,
        page: u64,
        size: u64,
    ) -> Result<CourseListResponse> {
        let mut select = Courses::find();

        match scope {
            CourseScope::All => {}
            CourseScope::TaughtBy(instructor_id) => {
                select = select.filter(courses::Column::InstructorId.eq(instructor_id));
            }
            CourseScope::EnrolledBy(student_id) => {
                let ids = self.list_enrolled_course_ids_impl(student_id).await?;
                select = select.filter(courses::Column::Id.is_in(ids));
            }
        }

        if let Some(department_id) = query.department_id {
            select = select.filter(courses::Column::DepartmentId.eq(department_id));
        }

        if let Some(semester) = query.semester {
            select = select.filter(courses::Column::Semester.eq(semester));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let search = search.trim();
            select = select.filter(
                Condition::any()
                    .add(courses::Column::Code.contains(search))
                    .add(courses::Column::Name.contains(search)),
            );
        }

        select = select.order_by_asc(courses::Column::Code);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(read_err("查询课程总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(read_err("查询课程页数失败"))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(read_err("查询课程列表失败"))?;

        let ids: Vec<i64> = items.iter().map(|m| m.id).collect();
        let counts = self.enrollment_counts(ids).await?;

        Ok(CourseListResponse {
            items: items
                .into_iter()
                .map(|m| {
                    let enrolled_count = counts.get(&m.id).copied().unwrap_or(0);
                    CourseSummary {
                        course: m.into_course(),
                        enrolled_count,
                    }
                })
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    async fn enrollment_counts(&self, course_ids: Vec<i64>) -> Result<HashMap<i64, u64>> {
        if course_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<i64> = Enrollments::find()
            .select_only()
            .column(enrollments::Column::CourseId)
            .filter(enrollments::Column::CourseId.is_in(course_ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("统计选课人数失败"))?;

        let mut counts = HashMap::new();
        for course_id in rows {
            *counts.entry(course_id).or_insert(0u64) += 1;
        }
        Ok(counts)
    }

    /// 更新课程
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(existing) = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(read_err("查询课程失败"))?
        else {
            return Ok(None);
        };

        let mut model: CourseActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(semester) = update.semester {
            model.semester = Set(Some(semester));
        }
        if let Some(department_id) = update.department_id {
            model.department_id = Set(Some(department_id));
        }
        if let Some(max_students) = update.max_students {
            model.max_students = Set(max_students);
        }
        if let Some(instructor_id) = update.instructor_id {
            model.instructor_id = Set(Some(instructor_id));
        }

        let result = model.update(&self.db).await.map_err(write_err("更新课程失败"))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程及其所有从属数据
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(write_err("开启事务失败"))?;

        let deleted = delete_course_cascade(&txn, id)
            .await
            .map_err(write_err("删除课程失败"))?;

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        Ok(deleted)
    }

    /// 教师所授课程 ID
    pub async fn list_taught_course_ids_impl(&self, instructor_id: i64) -> Result<Vec<i64>> {
        Courses::find()
            .select_only()
            .column(courses::Column::Id)
            .filter(courses::Column::InstructorId.eq(instructor_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("查询所授课程失败"))
    }

    /// 学生已选课程 ID
    pub async fn list_enrolled_course_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(enrollments::Column::CourseId)
            .filter(enrollments::Column::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err("查询已选课程失败"))
    }

    pub async fn get_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await
            .map_err(read_err("查询选课记录失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn count_enrollments_impl(&self, course_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .count(&self.db)
            .await
            .map_err(read_err("统计选课人数失败"))
    }

    /// 选课
    pub async fn create_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = EnrollmentActiveModel {
            student_id: Set(student_id),
            course_id: Set(course_id),
            grade_point: Set(None),
            grade_letter: Set(None),
            remarks: Set(None),
            enrolled_at: Set(now),
            graded_at: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(write_err("选课失败"))?;

        Ok(result.into_enrollment())
    }

    /// 退课
    pub async fn delete_enrollment_impl(&self, student_id: i64, course_id: i64) -> Result<bool> {
        let result = Enrollments::delete_many()
            .filter(enrollments::Column::StudentId.eq(student_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await
            .map_err(write_err("退课失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 课程学生名单，按姓名排序
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<CourseStudent>> {
        let rows = Enrollments::find()
            .filter(enrollments::Column::CourseId.eq(course_id))
            .all(&self.db)
            .await
            .map_err(read_err("查询选课记录失败"))?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();

        let users: HashMap<i64, users::Model> = Users::find()
            .filter(users::Column::Id.is_in(student_ids.clone()))
            .all(&self.db)
            .await
            .map_err(read_err("查询学生信息失败"))?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let roll_numbers: HashMap<i64, Option<String>> = StudentProfiles::find()
            .filter(student_profiles::Column::UserId.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(read_err("查询学生档案失败"))?
            .into_iter()
            .map(|p| (p.user_id, p.roll_number))
            .collect();

        let mut students: Vec<CourseStudent> = rows
            .into_iter()
            .filter_map(|row| {
                let user = users.get(&row.student_id)?;
                let enrollment = row.into_enrollment();
                Some(CourseStudent {
                    student_id: user.id,
                    full_name: user.full_name.clone(),
                    email: user.email.clone(),
                    roll_number: roll_numbers.get(&user.id).cloned().flatten(),
                    grade_point: enrollment.grade_point,
                    grade_letter: enrollment.grade_letter,
                    remarks: enrollment.remarks,
                    enrolled_at: enrollment.enrolled_at,
                })
            })
            .collect();
        students.sort_by(|a, b| a.full_name.cmp(&b.full_name));

        Ok(students)
    }

    pub async fn list_course_materials_impl(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        let result = CourseMaterials::find()
            .filter(course_materials::Column::CourseId.eq(course_id))
            .order_by_desc(course_materials::Column::CreatedAt)
            .order_by_desc(course_materials::Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err("查询课程资料失败"))?;

        Ok(result.into_iter().map(|m| m.into_material()).collect())
    }

    pub async fn create_course_material_impl(
        &self,
        course_id: i64,
        uploaded_by: i64,
        material: CreateMaterialRequest,
    ) -> Result<CourseMaterial> {
        let model = CourseMaterialActiveModel {
            course_id: Set(course_id),
            title: Set(material.title),
            description: Set(material.description),
            file_path: Set(material.file_path),
            uploaded_by: Set(uploaded_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(write_err("创建课程资料失败"))?;

        Ok(result.into_material())
    }

    pub async fn list_course_schedule_impl(&self, course_id: i64) -> Result<Vec<ScheduleSlot>> {
        let result = CourseSchedules::find()
            .filter(course_schedules::Column::CourseId.eq(course_id))
            .order_by_asc(course_schedules::Column::DayOfWeek)
            .order_by_asc(course_schedules::Column::StartTime)
            .all(&self.db)
            .await
            .map_err(read_err("查询课表失败"))?;

        Ok(result.into_iter().map(|m| m.into_slot()).collect())
    }

    pub async fn create_schedule_slot_impl(
        &self,
        course_id: i64,
        slot: CreateScheduleRequest,
    ) -> Result<ScheduleSlot> {
        let model = CourseScheduleActiveModel {
            course_id: Set(course_id),
            day_of_week: Set(slot.day_of_week),
            start_time: Set(slot.start_time),
            end_time: Set(slot.end_time),
            room: Set(slot.room),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(write_err("创建课表失败"))?;

        Ok(result.into_slot())
    }
}

/// 删除课程及作业、提交、选课、考勤、资料、课表和课程公告
pub(crate) async fn delete_course_cascade<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> std::result::Result<bool, DbErr> {
    let assignment_ids: Vec<i64> = Assignments::find()
        .select_only()
        .column(assignments::Column::Id)
        .filter(assignments::Column::CourseId.eq(id))
        .into_tuple()
        .all(conn)
        .await?;

    if !assignment_ids.is_empty() {
        Submissions::delete_many()
            .filter(submissions::Column::AssignmentId.is_in(assignment_ids))
            .exec(conn)
            .await?;
    }
    Assignments::delete_many()
        .filter(assignments::Column::CourseId.eq(id))
        .exec(conn)
        .await?;
    Enrollments::delete_many()
        .filter(enrollments::Column::CourseId.eq(id))
        .exec(conn)
        .await?;
    Attendance::delete_many()
        .filter(attendance::Column::CourseId.eq(id))
        .exec(conn)
        .await?;
    CourseMaterials::delete_many()
        .filter(course_materials::Column::CourseId.eq(id))
        .exec(conn)
        .await?;
    CourseSchedules::delete_many()
        .filter(course_schedules::Column::CourseId.eq(id))
        .exec(conn)
        .await?;

    let notice_ids: Vec<i64> = Notices::find()
        .select_only()
        .column(notices::Column::Id)
        .filter(notices::Column::CourseId.eq(id))
        .into_tuple()
        .all(conn)
        .await?;

    if !notice_ids.is_empty() {
        NoticeReads::delete_many()
            .filter(notice_reads::Column::NoticeId.is_in(notice_ids.clone()))
            .exec(conn)
            .await?;
        NoticeAttachments::delete_many()
            .filter(notice_attachments::Column::NoticeId.is_in(notice_ids.clone()))
            .exec(conn)
            .await?;
        Notices::delete_many()
            .filter(notices::Column::Id.is_in(notice_ids))
            .exec(conn)
            .await?;
    }

    let result = Courses::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}
