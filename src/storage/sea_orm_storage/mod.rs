//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 涉及多张表的写操作都在事务中完成，未提交的事务在 drop 时回滚。

mod assignments;
mod attendance;
mod courses;
mod departments;
mod grades;
mod notices;
mod sessions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{CollegeError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database).await
    }

    /// 按给定的数据库配置连接并运行迁移
    pub async fn connect(database: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, database).await?
        } else {
            Self::connect_generic(&db_url, database).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| CollegeError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, database: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| CollegeError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(database.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(database.timeout))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| CollegeError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, database: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(database.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(database.timeout))
            .acquire_timeout(Duration::from_secs(database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| CollegeError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(CollegeError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写操作错误映射：唯一约束冲突视为请求错误，其余为数据库错误
pub(crate) fn write_err(context: &'static str) -> impl Fn(DbErr) -> CollegeError {
    move |e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            CollegeError::validation(format!("{context}: record already exists"))
        }
        _ => CollegeError::database_operation(format!("{context}: {e}")),
    }
}

/// 读操作错误映射
pub(crate) fn read_err(context: &'static str) -> impl Fn(DbErr) -> CollegeError {
    move |e| CollegeError::database_operation(format!("{context}: {e}"))
}

pub(crate) fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// Storage trait 实现
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
    grades::{entities::GradeRow, requests::GradeUpdate, responses::BatchGradeResponse},
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_profile(
        &self,
        user_id: i64,
        user_type: UserType,
    ) -> Result<Option<UserProfile>> {
        self.get_user_profile_impl(user_id, user_type).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
        page: u64,
        size: u64,
    ) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query, page, size)
            .await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        self.update_password_impl(id, password_hash).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 会话模块
    async fn create_session(&self, session: NewSession) -> Result<Session> {
        self.create_session_impl(session).await
    }

    async fn get_valid_session(&self, token: &str, now: i64) -> Result<Option<Session>> {
        self.get_valid_session_impl(token, now).await
    }

    async fn delete_session(&self, token: &str) -> Result<bool> {
        self.delete_session_impl(token).await
    }

    async fn upsert_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<PasswordReset> {
        self.upsert_password_reset_impl(user_id, token, expires_at)
            .await
    }

    async fn reset_password(
        &self,
        token: &str,
        password_hash: &str,
        now: i64,
    ) -> Result<Option<i64>> {
        self.reset_password_impl(token, password_hash, now).await
    }

    // 院系模块
    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.list_departments_impl().await
    }

    async fn get_department_by_id(&self, id: i64) -> Result<Option<Department>> {
        self.get_department_by_id_impl(id).await
    }

    async fn get_department_by_code(&self, code: &str) -> Result<Option<Department>> {
        self.get_department_by_code_impl(code).await
    }

    async fn create_department(&self, code: &str, name: &str) -> Result<Department> {
        self.create_department_impl(code, name).await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(
        &self,
        scope: CourseScope,
        query: CourseListQuery,
        page: u64,
        size: u64,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(scope, query, page, size)
            .await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    async fn list_taught_course_ids(&self, instructor_id: i64) -> Result<Vec<i64>> {
        self.list_taught_course_ids_impl(instructor_id).await
    }

    async fn list_enrolled_course_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_enrolled_course_ids_impl(student_id).await
    }

    async fn get_enrollment(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(student_id, course_id).await
    }

    async fn count_enrollments(&self, course_id: i64) -> Result<u64> {
        self.count_enrollments_impl(course_id).await
    }

    async fn create_enrollment(&self, student_id: i64, course_id: i64) -> Result<Enrollment> {
        self.create_enrollment_impl(student_id, course_id).await
    }

    async fn delete_enrollment(&self, student_id: i64, course_id: i64) -> Result<bool> {
        self.delete_enrollment_impl(student_id, course_id).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<CourseStudent>> {
        self.list_course_students_impl(course_id).await
    }

    async fn list_course_materials(&self, course_id: i64) -> Result<Vec<CourseMaterial>> {
        self.list_course_materials_impl(course_id).await
    }

    async fn create_course_material(
        &self,
        course_id: i64,
        uploaded_by: i64,
        material: CreateMaterialRequest,
    ) -> Result<CourseMaterial> {
        self.create_course_material_impl(course_id, uploaded_by, material)
            .await
    }

    async fn list_course_schedule(&self, course_id: i64) -> Result<Vec<ScheduleSlot>> {
        self.list_course_schedule_impl(course_id).await
    }

    async fn create_schedule_slot(
        &self,
        course_id: i64,
        slot: CreateScheduleRequest,
    ) -> Result<ScheduleSlot> {
        self.create_schedule_slot_impl(course_id, slot).await
    }

    // 作业模块
    async fn create_assignment(&self, assignment: NewAssignment) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments(&self, course_ids: Option<Vec<i64>>) -> Result<Vec<Assignment>> {
        self.list_assignments_impl(course_ids).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, changes).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assignment_id, student_id).await
    }

    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        file_path: &str,
        comments: Option<String>,
        status: SubmissionStatus,
    ) -> Result<(Submission, bool)> {
        self.upsert_submission_impl(assignment_id, student_id, file_path, comments, status)
            .await
    }

    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<SubmissionWithStudent>> {
        self.list_submissions_impl(assignment_id).await
    }

    async fn list_student_submissions(
        &self,
        student_id: i64,
        assignment_ids: Vec<i64>,
    ) -> Result<Vec<Submission>> {
        self.list_student_submissions_impl(student_id, assignment_ids)
            .await
    }

    async fn grade_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        score: f64,
        feedback: Option<String>,
        graded_by: i64,
    ) -> Result<Option<Submission>> {
        self.grade_submission_impl(assignment_id, student_id, score, feedback, graded_by)
            .await
    }

    // 考勤模块
    async fn mark_attendance(
        &self,
        course_id: i64,
        date: &str,
        recorded_by: i64,
        records: Vec<(i64, AttendanceStatus, Option<String>)>,
    ) -> Result<MarkAttendanceResponse> {
        self.mark_attendance_impl(course_id, date, recorded_by, records)
            .await
    }

    async fn list_attendance(&self, query: AttendanceQuery) -> Result<Vec<AttendanceView>> {
        self.list_attendance_impl(query).await
    }

    async fn attendance_summary(
        &self,
        course_id: i64,
        student_id: Option<i64>,
    ) -> Result<AttendanceSummaryResponse> {
        self.attendance_summary_impl(course_id, student_id).await
    }

    async fn get_attendance_by_id(&self, id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_attendance_by_id_impl(id).await
    }

    async fn update_attendance(
        &self,
        id: i64,
        status: Option<AttendanceStatus>,
        remarks: Option<String>,
    ) -> Result<Option<AttendanceRecord>> {
        self.update_attendance_impl(id, status, remarks).await
    }

    async fn delete_attendance(&self, id: i64) -> Result<bool> {
        self.delete_attendance_impl(id).await
    }

    // 成绩模块
    async fn list_grade_rows(
        &self,
        student_id: Option<i64>,
        course_ids: Option<Vec<i64>>,
    ) -> Result<Vec<GradeRow>> {
        self.list_grade_rows_impl(student_id, course_ids).await
    }

    async fn record_grades(
        &self,
        course_id: i64,
        grades: Vec<GradeUpdate>,
    ) -> Result<BatchGradeResponse> {
        self.record_grades_impl(course_id, grades).await
    }

    // 公告模块
    async fn create_notice(&self, notice: NewNotice) -> Result<Notice> {
        self.create_notice_impl(notice).await
    }

    async fn get_notice_by_id(&self, id: i64) -> Result<Option<Notice>> {
        self.get_notice_by_id_impl(id).await
    }

    async fn list_notice_attachments(&self, notice_id: i64) -> Result<Vec<NoticeAttachment>> {
        self.list_notice_attachments_impl(notice_id).await
    }

    async fn list_notices_with_pagination(
        &self,
        audience: NoticeAudience,
        filter: NoticeFilter,
        user_id: i64,
    ) -> Result<NoticeListResponse> {
        self.list_notices_with_pagination_impl(audience, filter, user_id)
            .await
    }

    async fn mark_notice_read(&self, notice_id: i64, user_id: i64) -> Result<bool> {
        self.mark_notice_read_impl(notice_id, user_id).await
    }

    async fn count_notice_reads(&self, notice_id: i64) -> Result<u64> {
        self.count_notice_reads_impl(notice_id).await
    }

    async fn update_notice(&self, id: i64, changes: NoticeChanges) -> Result<Option<Notice>> {
        self.update_notice_impl(id, changes).await
    }

    async fn delete_notice(&self, id: i64) -> Result<bool> {
        self.delete_notice_impl(id).await
    }

    async fn count_unread_notices(
        &self,
        audience: NoticeAudience,
        user_id: i64,
        now: i64,
    ) -> Result<u64> {
        self.count_unread_notices_impl(audience, user_id, now).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::config::DatabaseConfig;

    /// 内存 SQLite，单连接保证所有查询落在同一个库
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .expect("in-memory storage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("college.db").unwrap(),
            "sqlite://college.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/college").unwrap(),
            "postgres://u:p@localhost/college"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }
}
