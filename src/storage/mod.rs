use std::sync::Arc;

use crate::models::{
    assignments::{
        entities::{Assignment, Submission, SubmissionStatus},
        requests::{AssignmentChanges, NewAssignment},
        responses::SubmissionWithStudent,
    },
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::AttendanceQuery,
        responses::{AttendanceSummaryResponse, AttendanceView, MarkAttendanceResponse},
    },
    auth::{
        entities::{PasswordReset, Session},
        requests::NewSession,
    },
    courses::{
        entities::{Course, CourseMaterial, Enrollment, ScheduleSlot},
        requests::{
            CourseListQuery, CourseScope, CreateCourseRequest, CreateMaterialRequest,
            CreateScheduleRequest, UpdateCourseRequest,
        },
        responses::{CourseListResponse, CourseStudent},
    },
    departments::entities::Department,
    grades::{
        entities::GradeRow,
        requests::GradeUpdate,
        responses::BatchGradeResponse,
    },
    notices::{
        entities::{Notice, NoticeAttachment, NoticeAudience},
        requests::{NewNotice, NoticeChanges, NoticeFilter},
        responses::NoticeListResponse,
    },
    users::{
        entities::{User, UserProfile, UserType},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户及其档案（事务）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 获取用户档案
    async fn get_user_profile(&self, user_id: i64, user_type: UserType)
    -> Result<Option<UserProfile>>;
    // 分页列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
        page: u64,
        size: u64,
    ) -> Result<UserListResponse>;
    // 更新用户及档案（事务）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户及其所有从属数据（事务）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 更新密码哈希
    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 会话与密码重置
    // 创建会话，同时清理该用户已过期的会话
    async fn create_session(&self, session: NewSession) -> Result<Session>;
    // 获取未过期的会话
    async fn get_valid_session(&self, token: &str, now: i64) -> Result<Option<Session>>;
    // 删除会话
    async fn delete_session(&self, token: &str) -> Result<bool>;
    // 写入或替换用户的重置令牌
    async fn upsert_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordReset>;
    // 使用重置令牌设置新密码，成功时返回用户ID（事务）
    async fn reset_password(
        &self,
        token: &str,
        password_hash: &str,
        now: i64,
    ) -> Result<Option<i64>>;

    /// 院系
    async fn list_departments(&self) -> Result<Vec<Department>>;
    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>>;
    async fn get_department_by_code(&self, code: &str) -> Result<Option<Department>>;
    async fn create_department(&self, code: &str, name: &str) -> Result<Department>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    // 通过课程代码获取课程
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    // 按可见范围分页列出课程
    async fn list_courses_with_pagination(
        &self,
        scope: CourseScope,
        query: CourseListQuery,
        page: u64,
        size: u64,
    ) -> Result<CourseListResponse>;
    // 更新课程
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    // 删除课程及其所有从属数据（事务）
    async fn delete_course(&self, id: i64) -> Result<bool>;
    // 教师所授课程ID
    async fn list_taught_course_ids(&self, instructor_id: i64) -> Result<Vec<i64>>;
    // 学生已选课程ID
    async fn list_enrolled_course_ids(&self, student_id: i64) -> Result<Vec<i64>>;

    /// 选课
    async fn get_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>>;
    async fn count_enrollments(&self, course_id: i64) -> Result<u64>;
    async fn create_enrollment(&self, student_id: i64, course_id: i64) -> Result<Enrollment>;
    async fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<bool>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<CourseStudent>>;

    /// 课程资料与课表
    async fn list_course_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>>;
    async fn create_course_material(
        &self,
        course_id: i64,
        uploaded_by: i64,
        material: CreateMaterialRequest,
    ) -> Result<CourseMaterial>;
    async fn list_course_schedule(&self, course_id: i64) -> Result<Vec<ScheduleSlot>>;
    async fn create_schedule_slot(
        &self,
        course_id: i64,
        slot: CreateScheduleRequest,
    ) -> Result<ScheduleSlot>;

    /// 作业管理方法
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    // course_ids 为 None 时列出全部
    async fn list_assignments(&self, course_ids: Option<Vec<i64>>) -> Result<Vec<Assignment>>;
    async fn update_assignment(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>>;
    // 删除作业及其提交（事务）
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 作业提交
    async fn get_submission(&self, assignment_id: i64, student_id: i64)
    -> Result<Option<Submission>>;
    // 按 (assignment_id, student_id) 写入或覆盖提交，返回 (提交, 是否为重新提交)
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        file_path: &str,
        comments: Option<String>,
        status: SubmissionStatus,
    ) -> Result<(Submission, bool)>;
    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<SubmissionWithStudent>>;
    async fn list_student_submissions(
        &self,
        student_id: i64,
        assignment_ids: Vec<i64>,
    ) -> Result<Vec<Submission>>;
    async fn grade_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>>;

    /// 考勤
    // 批量写入考勤，未选课学生跳过（事务）
    async fn mark_attendance(
        &self,
        course_id: i64,
        date: &str,
        recorded_by: i64,
        records: Vec<(i64, AttendanceStatus, Option<String>)>,
    ) -> Result<MarkAttendanceResponse>;
    async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<AttendanceView>>;
    async fn attendance_summary(
        &self,
        course_id: i64,
        student_id: Option<i64>,
    ) -> Result<AttendanceSummaryResponse>;
    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>>;
    async fn update_attendance(
        &self,
        id: i64,
        status: Option<AttendanceStatus>,
        remarks: Option<String>,
    ) -> Result<Option<AttendanceRecord>>;
    async fn delete_attendance(&self, id: i64) -> Result<bool>;

    /// 成绩
    // 按学生和/或课程范围列出成绩行
    async fn list_grade_rows(
        &self,
        student_id: Option<i64>,
        course_ids: Option<Vec<i64>>,
    ) -> Result<Vec<GradeRow>>;
    // 批量录入课程成绩，未选课学生跳过（事务）
    async fn record_grades(
        &self,
        course_id: i64,
        grades: Vec<GradeUpdate>,
    ) -> Result<BatchGradeResponse>;

    /// 公告
    // 创建公告及附件（事务）
    async fn create_notice(&self, notice: NewNotice) -> Result<Notice>;
    async fn get_notice_by_id(&self, id: i64) -> Result<Option<Notice>>;
    async fn list_notice_attachments(&self, notice_id: i64) -> Result<Vec<NoticeAttachment>>;
    async fn list_notices_with_pagination(
        &self,
        audience: NoticeAudience,
        filter: NoticeFilter,
        user_id: i64,
    ) -> Result<NoticeListResponse>;
    // 记录已读回执，已存在时不做任何事，返回是否新插入
    async fn mark_notice_read(&self, notice_id: i64, user_id: i64) -> Result<bool>;
    async fn count_notice_reads(&self, notice_id: i64) -> Result<u64>;
    // 更新公告，提供附件时整体替换（事务）
    async fn update_notice(&self, id: i64, changes: NoticeChanges) -> Result<Option<Notice>>;
    // 删除公告及回执、附件（事务）
    async fn delete_notice(&self, id: i64) -> Result<bool>;
    async fn count_unread_notices(
        &self,
        audience: NoticeAudience,
        user_id: i64,
        now: i64,
    ) -> Result<u64>;
}

/// 创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
